//! Data models shared by the repository, service, and API layers

pub mod book;
pub mod fine;
pub mod loan;
pub mod user;

pub use book::Book;
pub use fine::Fine;
pub use loan::Loan;
pub use user::User;
