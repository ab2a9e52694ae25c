pub mod seaorm;

pub use seaorm::SeaOrmMessageRepository;
