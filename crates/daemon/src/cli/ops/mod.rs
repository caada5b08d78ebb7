pub mod daemon;
pub mod health;
pub mod init;
pub mod resource;
pub mod version;

pub use daemon::Daemon;
pub use health::Health;
pub use init::Init;
pub use resource::Resource;
pub use version::Version;
