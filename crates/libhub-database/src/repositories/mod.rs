//! Repository implementations over PostgreSQL.

pub mod book;
pub mod member;
pub mod operator;
pub mod purchase;
pub mod session;

pub use book::BookRepository;
pub use member::MemberRepository;
pub use operator::OperatorRepository;
pub use purchase::PurchaseRepository;
pub use session::SessionRepository;
