pub mod history_repo;
