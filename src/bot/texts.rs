//! User-visible chat texts.

use crate::models::Action;

pub const SHARE_LOCATION_BUTTON: &str = "📍 Share current location";
pub const ADMIN_ONLY: &str = "Sorry, this command is for the administrator only.";
pub const FORWARDED_LOCATION: &str =
    "❌ A forwarded location cannot be used. Please send your current location directly.";
pub const SESSION_LOST: &str =
    "Something went wrong, please start again with /checkin or /checkout.";
pub const SELECTION_LOST: &str =
    "This selection is no longer active, please start again with /remotecheckin.";
pub const INVALID_LOCATION: &str = "❌ The received location is not valid, please try again.";
pub const VERIFYING: &str = "Verifying your location...";
pub const CANCELLED: &str = "Operation cancelled.";
pub const NO_KNOWN_USERS: &str = "There are no users in the records yet.";
pub const CHOOSE_REMOTE_USER: &str = "Choose the employee to check in remotely:";
pub const NO_OWN_RECORDS: &str = "No records were found for you.";
pub const STORE_EMPTY: &str = "The records file is empty or has not been created yet.";
pub const NO_RECORDS_TODAY: &str = "No records were found for today.";
pub const UNKNOWN_SUBJECT: &str = "Unknown";

pub fn welcome(first_name: &str, is_admin: bool) -> String {
    let mut text = format!(
        "Welcome {first_name} to the attendance bot.\n\n\
         Available commands:\n\
         📍 /checkin - record your arrival.\n\
         👋 /checkout - record your departure.\n\
         📋 /records - show your own records."
    );
    if is_admin {
        text.push_str(
            "\n\n--- Administrator commands ---\n\
             📁 /getrecordsfile - get the full records file.\n\
             📅 /gettoday - get today's records only.\n\
             🧑‍💻 /remotecheckin - check in an employee remotely.\n\
             🆔 /myid - show your id.",
        );
    }
    text
}

pub fn request_location(action: Action) -> String {
    format!(
        "To record your {}, share your location with the button below.",
        action.label()
    )
}

pub fn accepted(action: Action, distance: f64) -> String {
    format!(
        "✅ {} recorded successfully!\nYou are {:.2} meters from the target location.",
        capitalize(action.label()),
        distance
    )
}

pub fn rejected(distance: f64, threshold: f64) -> String {
    format!(
        "❌ Recording failed.\nYou are too far from the allowed location. \
         Current distance is {distance:.2} meters, the limit is {threshold:.2} meters."
    )
}

pub fn admin_notice(name: &str, user_id: i64, action: Action) -> String {
    format!("🔔 Notice: {name} ({user_id}) recorded '{}'.", action.label())
}

pub fn remote_done(name: &str) -> String {
    format!("✅ Remote check-in recorded for: {name}")
}

pub fn admin_remote_notice(name: &str) -> String {
    format!("🔔 Admin notice: you recorded a remote check-in for {name}.")
}

pub fn own_records(lines: &[String]) -> String {
    format!("📋 Your records:\n\n{}", lines.join("\n"))
}

pub fn my_id(user_id: i64) -> String {
    format!("Your id is:\n{user_id}\n\nPut this number in `admin_id` in the configuration file.")
}

pub fn send_failed(err: &str) -> String {
    format!("An error occurred while sending the file: {err}")
}

pub fn backup_caption(timestamp: &str) -> String {
    format!("Automatic records backup - {timestamp}")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
