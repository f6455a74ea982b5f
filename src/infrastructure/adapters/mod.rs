//! 애플리케이션 포트를 실제 인프라 구현체로 연결하는 어댑터 계층.

mod config_repository;
mod env_reader;
mod reporter;
mod table_source;
mod token_provider;
mod workspace_factory;

pub use config_repository::EnvConfigRepository;
pub use env_reader::ProcessEnvReader;
pub use reporter::ConsoleReporter;
pub use table_source::CsvWorkspaceTable;
pub use token_provider::EntraTokenProvider;
pub use workspace_factory::FabricClientFactoryAdapter;
