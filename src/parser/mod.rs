pub mod episode;

use regex::Regex;
use std::sync::OnceLock;

pub use episode::{Inference, infer, parse_episodes, parse_season};

pub(crate) fn get_regex(re: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    re.get_or_init(|| Regex::new(pattern).expect("Invalid regex pattern defined in code"))
}
