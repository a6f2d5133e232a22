//! One façade per API area. Each validates its arguments, builds an
//! [`Endpoint`](super::session::Endpoint) and delegates to the shared session.

pub mod games;
pub mod league;
pub mod players;
pub mod teams;

pub use games::Games;
pub use league::League;
pub use players::{LeadersQuery, Players};
pub use teams::{TeamStatsScope, Teams};
