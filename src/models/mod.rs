mod client;
mod client_query;
mod client_update;
mod new_client;
mod phone;

pub use client::Client;
pub use client_query::ClientQuery;
pub use client_update::ClientUpdate;
pub use new_client::NewClient;
pub use phone::Phone;
