mod init;
mod list;
mod seed;

pub use init::cmd_init;
pub use list::cmd_list_catalog;
pub use seed::cmd_seed;
