//! Client for the public NHL web API and stats API.
//!
//! Control flows one way: [`NhlClient`] → resource client
//! ([`League`], [`Teams`], [`Players`], [`Games`]) → [`NhlSession`] →
//! [`Transport`]. Responses are returned as untyped `serde_json::Value`s.

pub mod client;
pub mod params;
pub mod resources;
pub mod retry;
pub mod session;
pub mod transport;

pub use client::NhlClient;
pub use params::{ApiDate, GameType, Language, PlayerType, ScheduleType, SeasonId, TeamCode};
pub use resources::{Games, LeadersQuery, League, Players, TeamStatsScope, Teams};
pub use retry::RetryPolicy;
pub use session::{BaseUrl, BaseUrls, Endpoint, NhlSession, Payload, ResponseFormat};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
