pub mod scene;
pub mod trace;

pub use scene::{Scene, SceneConnection, SceneFunction};
pub use trace::{format_connections, format_downstream, format_functions};
