use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method, StatusCode},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use welfare_auth::auth_routes;

use crate::{
    handlers::{
        applicants::{
            create_applicant, delete_applicant, get_applicant, list_applicants, update_applicant,
        },
        assistance::{
            create_assistance, create_recurring, delete_assistance, get_assistance,
            list_assistance, list_recurring_logs, update_assistance,
        },
        boreholes::{
            create_borehole, delete_borehole, get_borehole, list_boreholes, update_borehole,
        },
        conversations::{
            create_conversation, delete_conversation, get_conversation, leave_conversation,
            list_conversations, mark_conversation_read, update_conversation,
        },
        employees::{
            create_employee, delete_employee, get_employee, list_employees, update_employee,
        },
        folders::{create_folder, delete_folder, get_folder, list_folders, update_folder},
        health::{health, livez},
        lookups::{create_lookup, delete_lookup, get_lookup, list_lookups, update_lookup},
        messages::{
            create_message, delete_message, download_attachment, get_message, list_messages,
            update_message, view_attachment,
        },
        participants::{
            create_participant, delete_participant, get_participant, list_participants,
            update_participant,
        },
        personal_files::{
            create_personal_file, delete_personal_file, download_file, get_personal_file,
            list_personal_files, update_personal_file, view_file,
        },
        tickets::{create_ticket, delete_ticket, get_ticket, list_tickets, update_ticket},
    },
    state::AppState,
};

/// Largest accepted request body, multipart uploads included.
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let api_routes = Router::new()
        .nest("/auth", auth_routes().with_state(state.auth.clone()))
        // Staff and applicants
        .route("/employee", get(list_employees).post(create_employee))
        .route(
            "/employee/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .route("/applicantDetails", get(list_applicants).post(create_applicant))
        .route(
            "/applicantDetails/{id}",
            get(get_applicant)
                .put(update_applicant)
                .delete(delete_applicant),
        )
        // Financial assistance
        .route(
            "/financialAssistance",
            get(list_assistance).post(create_assistance),
        )
        .route("/financialAssistance/recurring", post(create_recurring))
        .route(
            "/financialAssistance/recurring/logs",
            get(list_recurring_logs),
        )
        .route(
            "/financialAssistance/{id}",
            get(get_assistance)
                .put(update_assistance)
                .delete(delete_assistance),
        )
        // Imam programme
        .route("/borehole", get(list_boreholes).post(create_borehole))
        .route(
            "/borehole/{id}",
            get(get_borehole).put(update_borehole).delete(delete_borehole),
        )
        .route("/tickets", get(list_tickets).post(create_ticket))
        .route(
            "/tickets/{id}",
            get(get_ticket).put(update_ticket).delete(delete_ticket),
        )
        // Chat
        .route(
            "/conversations",
            get(list_conversations).post(create_conversation),
        )
        .route(
            "/conversations/{id}",
            get(get_conversation)
                .put(update_conversation)
                .delete(delete_conversation),
        )
        .route("/conversations/{id}/read", post(mark_conversation_read))
        .route(
            "/conversations/{id}/participants/me",
            delete(leave_conversation),
        )
        .route(
            "/conversationParticipants",
            get(list_participants).post(create_participant),
        )
        .route(
            "/conversationParticipants/{id}",
            get(get_participant)
                .put(update_participant)
                .delete(delete_participant),
        )
        .route("/messages", get(list_messages).post(create_message))
        .route(
            "/messages/{id}",
            get(get_message).put(update_message).delete(delete_message),
        )
        .route("/messages/{id}/view-attachment", get(view_attachment))
        .route("/messages/{id}/download-attachment", get(download_attachment))
        // File manager
        .route("/folders", get(list_folders).post(create_folder))
        .route(
            "/folders/{id}",
            get(get_folder).put(update_folder).delete(delete_folder),
        )
        .route(
            "/personalFiles",
            get(list_personal_files).post(create_personal_file),
        )
        .route(
            "/personalFiles/{id}",
            get(get_personal_file)
                .put(update_personal_file)
                .delete(delete_personal_file),
        )
        .route("/personalFiles/{id}/view-file", get(view_file))
        .route("/personalFiles/{id}/download-file", get(download_file))
        // Lookups
        .route("/lookup/{table}", get(list_lookups).post(create_lookup))
        .route(
            "/lookup/{table}/{id}",
            get(get_lookup).put(update_lookup).delete(delete_lookup),
        )
        .layer(cors);

    let request_timeout = state.request_timeout;

    // Main application router
    Router::new()
        .route("/health", get(health))
        .route("/livez", get(livez))
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state)
}
