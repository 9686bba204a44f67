//! Configuration access port trait.
//!
//! Keys are looked up by `[section] key`; typed parsing lives in
//! `domain::config_validation` so every value is judged in one place.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
}
