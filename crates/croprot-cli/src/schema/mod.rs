pub mod session_record;
pub mod settings;
