//! sea-orm entities for the API service database.

pub mod users;
