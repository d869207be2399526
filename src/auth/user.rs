use serde::Serialize;

/// The logged-in person for one browser session.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub display_name: String,
}
