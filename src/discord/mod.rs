mod presence;

pub use presence::{DiscordConnection, DiscordConnector};
