use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;
use crate::audit::Audit;
use crate::serde::{
    deserialize_id_list, deserialize_lenient_bool, deserialize_lenient_f64,
    deserialize_lenient_i64, deserialize_optional_datetime, deserialize_optional_string,
};

use super::OutreachError;

/// Status assigned to tickets created without one ("Pending").
pub const DEFAULT_TICKET_STATUS: i64 = 1;

/// A borehole request raised for an imam's community.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Borehole {
    pub id: i64,
    pub imam_profile_id: i64,
    /// `Borehole_Location` lookup id.
    pub where_required: Option<i64>,
    pub has_electricity: Option<i64>,
    pub received_borehole_before: Option<i64>,
    /// `Water_Source` lookup id.
    pub current_water_source: Option<i64>,
    pub distance_to_water_source: Option<String>,
    pub beneficiaries_count: Option<i64>,
    pub challenges_due_to_lack_of_water: Option<String>,
    pub motivation: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub acknowledge: bool,
    pub status_id: Option<i64>,
    pub comment: Option<String>,
    /// `Water_Usage_Purpose` lookup ids.
    pub water_usage_purpose_ids: Vec<i64>,
    pub current_water_source_image: Option<Attachment>,
    pub masjid_area_image: Option<Attachment>,
    pub center_id: Option<i64>,
    #[serde(flatten)]
    pub audit: Audit,
}

/// A borehole with the names of its lookups resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoreholeView {
    #[serde(flatten)]
    pub borehole: Borehole,
    pub where_required_name: Option<String>,
    pub current_water_source_name: Option<String>,
    /// Purpose names, sorted and comma separated.
    pub water_usage_purposes: String,
}

pub fn borehole_view(
    borehole: Borehole,
    where_required_name: Option<String>,
    current_water_source_name: Option<String>,
    mut purposes: Vec<String>,
) -> BoreholeView {
    purposes.sort();
    BoreholeView {
        borehole,
        where_required_name,
        current_water_source_name,
        water_usage_purposes: purposes.join(", "),
    }
}

/// Create/update payload for a borehole. Multipart forms send every field
/// as text, so numbers and flags are parsed leniently.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoreholeInput {
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub imam_profile_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub where_required: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub has_electricity: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub received_borehole_before: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub current_water_source: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub distance_to_water_source: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub beneficiaries_count: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub challenges_due_to_lack_of_water: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub motivation: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_bool")]
    pub acknowledge: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub status_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub comment: Option<String>,
    #[serde(default, deserialize_with = "deserialize_id_list")]
    pub water_usage_purpose_ids: Option<Vec<i64>>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub center_id: Option<i64>,
}

impl BoreholeInput {
    /// True when the payload carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.imam_profile_id.is_none()
            && self.where_required.is_none()
            && self.has_electricity.is_none()
            && self.received_borehole_before.is_none()
            && self.current_water_source.is_none()
            && self.distance_to_water_source.is_none()
            && self.beneficiaries_count.is_none()
            && self.challenges_due_to_lack_of_water.is_none()
            && self.motivation.is_none()
            && self.longitude.is_none()
            && self.latitude.is_none()
            && self.acknowledge.is_none()
            && self.status_id.is_none()
            && self.comment.is_none()
            && self.water_usage_purpose_ids.is_none()
            && self.center_id.is_none()
    }

    /// Builds a new borehole. The store assigns the id.
    pub fn into_borehole(
        self,
        current_water_source_image: Option<Attachment>,
        masjid_area_image: Option<Attachment>,
        audit: Audit,
    ) -> Result<Borehole, OutreachError> {
        Ok(Borehole {
            id: 0,
            imam_profile_id: self
                .imam_profile_id
                .ok_or(OutreachError::MissingField("imam_profile_id"))?,
            where_required: self.where_required,
            has_electricity: self.has_electricity,
            received_borehole_before: self.received_borehole_before,
            current_water_source: self.current_water_source,
            distance_to_water_source: self.distance_to_water_source,
            beneficiaries_count: self.beneficiaries_count,
            challenges_due_to_lack_of_water: self.challenges_due_to_lack_of_water,
            motivation: self.motivation,
            longitude: self.longitude,
            latitude: self.latitude,
            acknowledge: self.acknowledge.unwrap_or(false),
            status_id: self.status_id,
            comment: self.comment,
            water_usage_purpose_ids: self.water_usage_purpose_ids.unwrap_or_default(),
            current_water_source_image,
            masjid_area_image,
            center_id: self.center_id,
            audit,
        })
    }

    /// Copies the provided fields onto an existing borehole.
    ///
    /// A present `water_usage_purpose_ids` replaces the whole set.
    pub fn apply_to(self, borehole: &mut Borehole) {
        if let Some(imam_profile_id) = self.imam_profile_id {
            borehole.imam_profile_id = imam_profile_id;
        }
        if self.where_required.is_some() {
            borehole.where_required = self.where_required;
        }
        if self.has_electricity.is_some() {
            borehole.has_electricity = self.has_electricity;
        }
        if self.received_borehole_before.is_some() {
            borehole.received_borehole_before = self.received_borehole_before;
        }
        if self.current_water_source.is_some() {
            borehole.current_water_source = self.current_water_source;
        }
        if self.distance_to_water_source.is_some() {
            borehole.distance_to_water_source = self.distance_to_water_source;
        }
        if self.beneficiaries_count.is_some() {
            borehole.beneficiaries_count = self.beneficiaries_count;
        }
        if self.challenges_due_to_lack_of_water.is_some() {
            borehole.challenges_due_to_lack_of_water = self.challenges_due_to_lack_of_water;
        }
        if self.motivation.is_some() {
            borehole.motivation = self.motivation;
        }
        if self.longitude.is_some() {
            borehole.longitude = self.longitude;
        }
        if self.latitude.is_some() {
            borehole.latitude = self.latitude;
        }
        if self.status_id.is_some() {
            borehole.status_id = self.status_id;
        }
        if self.comment.is_some() {
            borehole.comment = self.comment;
        }
        if self.center_id.is_some() {
            borehole.center_id = self.center_id;
        }
        if let Some(acknowledge) = self.acknowledge {
            borehole.acknowledge = acknowledge;
        }
        if let Some(ids) = self.water_usage_purpose_ids {
            borehole.water_usage_purpose_ids = ids;
        }
    }
}

/// A support ticket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ticket {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub classification_id: Option<i64>,
    pub status_id: i64,
    pub allocated_to: Option<i64>,
    pub closed_at: Option<DateTime<Utc>>,
    pub media: Option<Attachment>,
    pub center_id: Option<i64>,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketInput {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
    #[serde(
        default,
        alias = "classification",
        deserialize_with = "deserialize_lenient_i64"
    )]
    pub classification_id: Option<i64>,
    #[serde(default, alias = "status", deserialize_with = "deserialize_lenient_i64")]
    pub status_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub allocated_to: Option<i64>,
    #[serde(
        default,
        alias = "closed_time",
        deserialize_with = "deserialize_optional_datetime"
    )]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub center_id: Option<i64>,
}

impl TicketInput {
    pub fn into_ticket(
        self,
        media: Option<Attachment>,
        audit: Audit,
    ) -> Result<Ticket, OutreachError> {
        Ok(Ticket {
            id: 0,
            title: self.title.ok_or(OutreachError::MissingField("title"))?,
            description: self.description,
            classification_id: self.classification_id,
            status_id: self.status_id.unwrap_or(DEFAULT_TICKET_STATUS),
            allocated_to: self.allocated_to,
            closed_at: self.closed_at,
            media,
            center_id: self.center_id,
            audit,
        })
    }

    pub fn apply_to(self, ticket: &mut Ticket) {
        if let Some(title) = self.title {
            ticket.title = title;
        }
        if let Some(status_id) = self.status_id {
            ticket.status_id = status_id;
        }
        if self.description.is_some() {
            ticket.description = self.description;
        }
        if self.classification_id.is_some() {
            ticket.classification_id = self.classification_id;
        }
        if self.allocated_to.is_some() {
            ticket.allocated_to = self.allocated_to;
        }
        if self.closed_at.is_some() {
            ticket.closed_at = self.closed_at;
        }
        if self.center_id.is_some() {
            ticket.center_id = self.center_id;
        }
    }
}
