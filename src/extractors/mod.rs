mod pageable;

pub use pageable::Pageable;
