//! Maze escape with pursuit: board generation with guaranteed
//! entry-to-exit reachability, shortest-path search over the board, sentry
//! agents that chase the player on sight and patrol otherwise, and the
//! terminal front-end that plays it all.

pub mod agents;
pub mod app;
pub mod generator;
pub mod maze;
pub mod pursuit;
pub mod scenario;
pub mod search;
