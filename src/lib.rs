//! Kanban Board Client Core
//!
//! Layered architecture:
//! - models: Board/Column/Task shapes shared with the store
//! - intent + reducer: pure board edits
//! - drag: maps finished drag gestures to intents
//! - store + gateway: local state, optimistic apply, persistence
//! - config: file-backed settings and bootstrap

pub mod config;
pub mod drag;
pub mod gateway;
pub mod intent;
pub mod models;
pub mod reducer;
pub mod store;

use std::sync::Arc;

use kanban_store::{init_db, DbState, DomainResult, SqliteBoardRepository};

pub use config::{ConfigError, KanbanConfig, LogConfig};
pub use drag::{classify, interpret, DraggedKind};
pub use gateway::{BoardGateway, GatewayError, GatewayResult, TogglePersistence};
pub use intent::{Intent, Placement, TaskTarget};
pub use reducer::{apply, EmptyColumnPolicy, Reducer, ReducerSettings};
pub use store::{BoardState, BoardStore};
pub use rolling_logger::{log_dir, recent_lines};

/// Everything a client session needs, wired from one config
#[derive(Clone)]
pub struct AppState {
    pub config: KanbanConfig,
    pub db_state: DbState,
    pub gateway: BoardGateway,
}

/// Open the SQLite store and build a gateway over it
pub async fn bootstrap(config: &KanbanConfig) -> DomainResult<AppState> {
    let db_state = init_db(&config.db_path).await?;
    let repo = SqliteBoardRepository::new(db_state.conn.clone());

    let gateway = BoardGateway::new(Arc::new(repo))
        .with_reducer(Reducer::new(config.reducer.clone()))
        .with_toggle_persistence(config.toggle_persistence);

    log::info!("Kanban store ready at {:?}", config.db_path);
    Ok(AppState {
        config: config.clone(),
        db_state,
        gateway,
    })
}

/// Route `log` records to stderr and the rolling log files
pub fn init_logging(config: &LogConfig) -> Result<(), rolling_logger::LoggerError> {
    let mut options = rolling_logger::LoggerOptions::new(&config.dir, &config.app_name);
    options.max_files = config.max_files;
    rolling_logger::init_logger_with(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BoardId, TaskId};
    use board_dragdrop::{Container, DragEnd, DragItem, DropTarget};
    use kanban_store::BoardRepository;

    fn memory_config() -> KanbanConfig {
        KanbanConfig {
            db_path: ":memory:".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_bootstrap_seeds_and_persists() {
        let app = bootstrap(&memory_config()).await.unwrap();
        let board = app.gateway.load(None).await.unwrap().unwrap();
        assert_eq!(board.id, BoardId(1));

        let task = board.columns[0].tasks[0].id.clone();
        let done = board.columns[2].id.clone();

        // Drag the first backlog task onto the Done column
        let start = DragItem::in_group(task.to_string(), board.columns[0].id.to_string(), 0);
        let end = DragEnd {
            over: Some(DropTarget::Zone(Container::Group(done.to_string()))),
        };
        let intent = interpret(&start, &end).unwrap();
        app.gateway.dispatch(intent).unwrap().await.unwrap();

        let repo = SqliteBoardRepository::new(app.db_state.conn.clone());
        let stored = repo.get_board(Some(board.id)).await.unwrap().unwrap();
        assert_eq!(stored.columns[2].tasks[0].id, task);
        assert!(!stored.columns[2].tasks[0].completed);
        assert!(stored.columns[0].task_index(&task).is_none());
    }

    #[tokio::test]
    async fn test_bootstrap_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = KanbanConfig {
            db_path: dir.path().join("data").join("kanban.db"),
            ..Default::default()
        };

        let app = bootstrap(&config).await.unwrap();
        let board = app.gateway.load(None).await.unwrap().unwrap();
        let column = board.columns[0].id.clone();
        app.gateway
            .dispatch(Intent::insert_task(column, 0, "Write release notes"))
            .unwrap()
            .await
            .unwrap();
        app.db_state.close().await;

        let reopened = bootstrap(&config).await.unwrap();
        let board = reopened.gateway.load(None).await.unwrap().unwrap();
        assert_eq!(board.columns[0].tasks[0].text, "Write release notes");
        assert_ne!(board.columns[0].tasks[0].id, TaskId::from(""));
    }

    #[test]
    fn test_config_drag_threshold() {
        let config = KanbanConfig {
            drag_threshold_px: 10,
            ..Default::default()
        };
        let mut session = config.drag_session();
        session.press(DragItem::root("c1".to_string(), 0), 0, 0);
        assert!(!session.pointer_move(6, 0));
        assert!(session.pointer_move(12, 0));
    }
}
