//! Per-participant visibility and read tracking.
//!
//! A participant who deletes a conversation stops seeing it until a new
//! message arrives. The restore then hides everything sent before the new
//! message, so the participant starts from a clean history.

use chrono::{DateTime, Duration, Utc};

use crate::people::{full_name, Employee};

use super::{ConversationKind, ConversationParticipant, Message, ReadReceipt};

/// How far before the triggering message `last_restored_at` is placed.
pub const RESTORE_LEAD_SECONDS: i64 = 1;

fn has_receipt(receipts: &[ReadReceipt], message_id: i64, employee_id: i64) -> bool {
    receipts
        .iter()
        .any(|r| r.message_id == message_id && r.employee_id == employee_id)
}

/// Whether `participant` may see `message`.
///
/// Non-participants see nothing. After a restore, only messages created at
/// or after `last_restored_at` are visible.
pub fn is_message_visible(
    message: &Message,
    participant: Option<&ConversationParticipant>,
) -> bool {
    let Some(participant) = participant else {
        return false;
    };
    participant.conversation_id == message.conversation_id
        && participant
            .last_restored_at
            .is_none_or(|restored| message.audit.created_at >= restored)
}

/// Whether `participant` was in the conversation when `message` was sent.
pub fn is_eligible_reader(participant: &ConversationParticipant, message: &Message) -> bool {
    let sent_at = message.audit.created_at;
    participant.joined_date <= sent_at.date_naive()
        && participant.deleted_at.is_none_or(|deleted| deleted > sent_at)
}

/// Whether the message has been read by the people it was sent to.
///
/// Only participants other than the sender who were eligible readers count.
/// Group and announcement messages need a receipt from each of them; a
/// direct message needs one from the other party. Without any eligible
/// reader the message is not considered read.
pub fn all_read_by_participants(
    message: &Message,
    kind: ConversationKind,
    participants: &[ConversationParticipant],
    receipts: &[ReadReceipt],
) -> bool {
    let mut readers = participants
        .iter()
        .filter(|p| p.employee_id != message.sender_id && is_eligible_reader(p, message))
        .peekable();

    if readers.peek().is_none() {
        return false;
    }

    match kind {
        ConversationKind::Group | ConversationKind::Announcement => {
            readers.all(|p| has_receipt(receipts, message.id, p.employee_id))
        }
        ConversationKind::Direct => {
            readers.any(|p| has_receipt(receipts, message.id, p.employee_id))
        }
    }
}

/// Number of messages `user_id` has not read yet.
///
/// Own messages and messages hidden by a restore are not counted.
pub fn unread_count(
    user_id: i64,
    messages: &[Message],
    participant: &ConversationParticipant,
    receipts: &[ReadReceipt],
) -> usize {
    messages
        .iter()
        .filter(|m| m.sender_id != user_id)
        .filter(|m| is_message_visible(m, Some(participant)))
        .filter(|m| !has_receipt(receipts, m.id, user_id))
        .count()
}

/// Brings a deleted conversation back when a new message arrives.
///
/// Returns whether the participant changed. Participants that never
/// deleted the conversation keep their current `last_restored_at`.
pub fn restore_for_new_message(
    participant: &mut ConversationParticipant,
    message_created_at: DateTime<Utc>,
) -> bool {
    if participant.deleted_at.is_none() {
        return false;
    }
    participant.deleted_at = None;
    participant.last_restored_at =
        Some(message_created_at - Duration::seconds(RESTORE_LEAD_SECONDS));
    true
}

/// Hides the conversation for this participant.
pub fn mark_deleted(participant: &mut ConversationParticipant, now: DateTime<Utc>) {
    participant.deleted_at = Some(now);
}

/// Names of the other participants, sorted and comma separated.
///
/// Returns `None` when nobody else is in the conversation.
pub fn direct_participant_names(
    user_id: i64,
    participants: &[ConversationParticipant],
    employees: &[Employee],
) -> Option<String> {
    let mut names: Vec<String> = participants
        .iter()
        .filter(|p| p.employee_id != user_id)
        .filter_map(|p| employees.iter().find(|e| e.id == p.employee_id))
        .map(|e| full_name(&e.name, &e.surname))
        .collect();
    if names.is_empty() {
        return None;
    }
    names.sort();
    Some(names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Audit;
    use crate::messaging::ReadStatus;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, 0, 0).unwrap()
    }

    fn message(id: i64, sender_id: i64, created_at: DateTime<Utc>) -> Message {
        Message {
            id,
            conversation_id: 1,
            sender_id,
            message_text: Some(format!("message {id}")),
            attachment: None,
            read_status: ReadStatus::Unread,
            audit: Audit::new("sender", created_at),
        }
    }

    fn participant(employee_id: i64) -> ConversationParticipant {
        ConversationParticipant::joining(1, employee_id, Audit::new("admin", at(0)))
    }

    fn receipt(message_id: i64, employee_id: i64) -> ReadReceipt {
        ReadReceipt {
            message_id,
            employee_id,
            read_at: at(23),
        }
    }

    #[test]
    fn visibility_requires_participation() {
        let m = message(1, 10, at(9));
        assert!(!is_message_visible(&m, None));
        assert!(is_message_visible(&m, Some(&participant(11))));

        let mut other = participant(11);
        other.conversation_id = 2;
        assert!(!is_message_visible(&m, Some(&other)));
    }

    #[test]
    fn messages_before_restore_are_hidden() {
        let mut p = participant(11);
        p.last_restored_at = Some(at(10));
        assert!(!is_message_visible(&message(1, 10, at(9)), Some(&p)));
        assert!(is_message_visible(&message(2, 10, at(10)), Some(&p)));
        assert!(is_message_visible(&message(3, 10, at(11)), Some(&p)));
    }

    #[test]
    fn eligible_reader_window() {
        let m = message(1, 10, at(12));
        let mut p = participant(11);
        assert!(is_eligible_reader(&p, &m));

        p.deleted_at = Some(at(11));
        assert!(!is_eligible_reader(&p, &m));

        p.deleted_at = Some(at(13));
        assert!(is_eligible_reader(&p, &m));

        let mut late = participant(12);
        late.joined_date = at(0).date_naive().succ_opt().unwrap();
        assert!(!is_eligible_reader(&late, &m));
    }

    #[test]
    fn direct_message_read_by_other_party() {
        let m = message(1, 10, at(9));
        let participants = vec![participant(10), participant(11)];
        assert!(!all_read_by_participants(
            &m,
            ConversationKind::Direct,
            &participants,
            &[]
        ));
        assert!(all_read_by_participants(
            &m,
            ConversationKind::Direct,
            &participants,
            &[receipt(1, 11)]
        ));
        // The sender's own receipt does not count.
        assert!(!all_read_by_participants(
            &m,
            ConversationKind::Direct,
            &participants,
            &[receipt(1, 10)]
        ));
    }

    #[test]
    fn group_message_needs_every_reader() {
        let m = message(1, 10, at(9));
        let participants = vec![participant(10), participant(11), participant(12)];
        assert!(!all_read_by_participants(
            &m,
            ConversationKind::Group,
            &participants,
            &[receipt(1, 11)]
        ));
        assert!(all_read_by_participants(
            &m,
            ConversationKind::Announcement,
            &participants,
            &[receipt(1, 11), receipt(1, 12)]
        ));
    }

    #[test]
    fn group_ignores_readers_who_left_before_sending() {
        let m = message(1, 10, at(9));
        let mut left = participant(12);
        left.deleted_at = Some(at(8));
        let participants = vec![participant(10), participant(11), left];
        assert!(all_read_by_participants(
            &m,
            ConversationKind::Group,
            &participants,
            &[receipt(1, 11)]
        ));
    }

    #[test]
    fn no_eligible_readers_means_unread() {
        let m = message(1, 10, at(9));
        let participants = vec![participant(10)];
        assert!(!all_read_by_participants(
            &m,
            ConversationKind::Group,
            &participants,
            &[]
        ));
    }

    #[test]
    fn unread_count_skips_own_read_and_hidden() {
        let mut p = participant(11);
        p.last_restored_at = Some(at(10));
        let messages = vec![
            message(1, 10, at(9)),  // hidden by restore
            message(2, 10, at(11)), // unread
            message(3, 11, at(12)), // own
            message(4, 10, at(13)), // read
        ];
        assert_eq!(unread_count(11, &messages, &p, &[receipt(4, 11)]), 1);
    }

    #[test]
    fn restore_only_touches_deleted_participants() {
        let mut active = participant(11);
        assert!(!restore_for_new_message(&mut active, at(12)));
        assert_eq!(active.last_restored_at, None);

        let mut deleted = participant(12);
        mark_deleted(&mut deleted, at(10));
        assert_eq!(deleted.deleted_at, Some(at(10)));

        assert!(restore_for_new_message(&mut deleted, at(12)));
        assert_eq!(deleted.deleted_at, None);
        assert_eq!(
            deleted.last_restored_at,
            Some(at(12) - Duration::seconds(1))
        );
        // The triggering message stays visible.
        assert!(is_message_visible(&message(5, 10, at(12)), Some(&deleted)));
    }

    #[test]
    fn participant_names_exclude_current_user() {
        let employee = |id: i64, name: &str, surname: &str| Employee {
            id,
            center_id: None,
            name: name.to_string(),
            surname: surname.to_string(),
            username: name.to_lowercase(),
            password_hash: String::new(),
            user_type: 5,
            email: None,
            contact_number: None,
            department: None,
            audit: Audit::new("admin", at(0)),
        };
        let employees = vec![
            employee(10, "Zaid", "Omar"),
            employee(11, "Amina", "Patel"),
            employee(12, "Bilal", "Khan"),
        ];
        let participants = vec![participant(10), participant(11), participant(12)];
        assert_eq!(
            direct_participant_names(10, &participants, &employees).as_deref(),
            Some("Amina Patel, Bilal Khan")
        );
        assert_eq!(
            direct_participant_names(10, &participants[..1], &employees),
            None
        );
    }
}
