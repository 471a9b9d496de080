pub mod prelude;

pub mod tv_episodes;
pub mod tv_shows;
