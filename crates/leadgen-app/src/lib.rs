// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod analytics;
pub mod filter;
pub mod forms;
pub mod hierarchy;
pub mod ids;
pub mod model;
pub mod navigation;
pub mod outreach;
pub mod routes;
pub mod state;
pub mod templates;
pub mod wizard;
pub mod workspace;

pub use analytics::*;
pub use filter::*;
pub use forms::*;
pub use hierarchy::*;
pub use ids::*;
pub use model::*;
pub use navigation::*;
pub use outreach::*;
pub use routes::*;
pub use state::*;
pub use templates::*;
pub use wizard::*;
pub use workspace::*;
