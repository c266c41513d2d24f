pub mod sqlite_shop_repo;
pub mod sqlite_user_repo;
pub mod sqlite_service_repo;
pub mod sqlite_barber_repo;
pub mod sqlite_block_repo;
pub mod sqlite_appointment_repo;

pub mod postgres_shop_repo;
pub mod postgres_user_repo;
pub mod postgres_service_repo;
pub mod postgres_barber_repo;
pub mod postgres_block_repo;
pub mod postgres_appointment_repo;
