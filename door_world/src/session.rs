// session.rs - Regenerate and grow the dungeon behind a journey store

use std::sync::{Arc, RwLock};

use log::{debug, info};

use crate::dungeon::helpers::{find_room_at, get_dungeon_room_by_id};
use crate::dungeon::{generate_dungeon, generate_rooms_around, CancelToken, GrowOptions};
use crate::error_handling::{DungeonError, Result};
use crate::journey::{JourneyAction, JourneyStore};
use crate::settings::DungeonSettings;
use crate::types::{DungeonData, Position, RoomId};

/// Rooms placed around each target when growing on demand.
pub const GROW_ROOM_COUNT: usize = 3;

/// Owns the dungeon lifecycle and publishes every version into the store.
pub struct DungeonSession {
    store: Arc<JourneyStore>,
    progress: RwLock<f64>,
}

impl DungeonSession {
    pub fn new(store: Arc<JourneyStore>) -> Self {
        Self {
            store,
            progress: RwLock::new(100.0),
        }
    }

    pub fn store(&self) -> &Arc<JourneyStore> {
        &self.store
    }

    /// Percentage of the last regeneration, 100 when idle.
    pub fn generation_progress(&self) -> Result<f64> {
        self.progress
            .read()
            .map(|p| *p)
            .map_err(|_| DungeonError::LockError)
    }

    pub fn is_generating(&self) -> Result<bool> {
        Ok(self.generation_progress()? < 100.0)
    }

    fn set_progress(&self, value: f64) -> Result<()> {
        let mut progress = self.progress.write().map_err(|_| DungeonError::LockError)?;
        *progress = value;
        Ok(())
    }

    pub async fn regenerate(&self, settings: &DungeonSettings) -> Result<Arc<DungeonData>> {
        self.regenerate_with_progress(settings, |_| {}, None).await
    }

    /// Build a fresh dungeon, publishing each intermediate snapshot so
    /// observers can watch it grow.
    pub async fn regenerate_with_progress<F>(
        &self,
        settings: &DungeonSettings,
        mut on_progress: F,
        cancel: Option<&CancelToken>,
    ) -> Result<Arc<DungeonData>>
    where
        F: FnMut(f64),
    {
        let options = settings.generate_options()?;
        let max_rooms = options.max_rooms.max(1) as f64;
        info!(
            "Regenerating dungeon: seed {}, strategy {}, max rooms {}",
            settings.seed, settings.strategy, settings.max_rooms
        );

        self.set_progress(0.0)?;
        on_progress(0.0);

        let mut publish_error = None;
        let result = generate_dungeon(
            options,
            |snapshot| {
                let percent = (snapshot.rooms.len() as f64 / max_rooms * 100.0).min(100.0);
                let published = self
                    .set_progress(percent)
                    .and_then(|()| {
                        self.store
                            .dispatch(JourneyAction::LoadDungeon(Arc::new(snapshot.clone())))
                    });
                match published {
                    Ok(()) => on_progress(percent),
                    Err(e) => {
                        publish_error.get_or_insert(e);
                    }
                }
            },
            cancel,
        )
        .await;

        // Progress always finishes, even when generation failed
        self.set_progress(100.0)?;
        on_progress(100.0);

        let dungeon = Arc::new(result?);
        if let Some(e) = publish_error {
            return Err(e);
        }
        self.store
            .dispatch(JourneyAction::LoadDungeon(Arc::clone(&dungeon)))?;
        Ok(dungeon)
    }

    /// Grow [`GROW_ROOM_COUNT`] rooms around `room_id`. Each further level of
    /// `recurse_count` grows around the rooms the previous level placed. The
    /// journey carries on as it was.
    pub fn grow_around(&self, room_id: RoomId, recurse_count: usize) -> Result<Arc<DungeonData>> {
        let dungeon = self.store.dungeon()?.ok_or(DungeonError::NoDungeon)?;
        let target = get_dungeon_room_by_id(&dungeon, room_id)
            .cloned()
            .ok_or(DungeonError::RoomNotFound(room_id))?;

        let options = GrowOptions::new(target)
            .room_count(GROW_ROOM_COUNT)
            .recurse_count(recurse_count);
        let grown = Arc::new(generate_rooms_around(&dungeon, options));
        debug!(
            "Grew {} rooms around room {}",
            grown.rooms.len() - dungeon.rooms.len(),
            room_id
        );

        self.store
            .dispatch(JourneyAction::ExtendDungeon(Arc::clone(&grown)))?;
        Ok(grown)
    }

    /// Id of the room containing `point`, if any.
    pub fn room_at(&self, point: Position) -> Result<Option<RoomId>> {
        let dungeon = self.store.dungeon()?.ok_or(DungeonError::NoDungeon)?;
        Ok(find_room_at(&dungeon, point).map(|room| room.id))
    }

    /// Pretty JSON of the current dungeon.
    pub fn export_json(&self) -> Result<String> {
        let dungeon = self.store.dungeon()?.ok_or(DungeonError::NoDungeon)?;
        Ok(serde_json::to_string_pretty(dungeon.as_ref())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StrategyType;
    use std::sync::Mutex;

    fn session() -> DungeonSession {
        DungeonSession::new(Arc::new(JourneyStore::new()))
    }

    fn settings(max_rooms: usize) -> DungeonSettings {
        DungeonSettings {
            seed: 1974,
            strategy: StrategyType::Random,
            max_rooms,
        }
    }

    #[tokio::test]
    async fn test_regenerate_publishes_dungeon() {
        let session = session();
        let dungeon = session.regenerate(&settings(20)).await.unwrap();

        let stored = session.store().dungeon().unwrap().unwrap();
        assert_eq!(stored.as_ref(), dungeon.as_ref());
        assert_eq!(session.store().get_state().unwrap().seed, dungeon.seed);
        assert!(!session.is_generating().unwrap());
    }

    #[tokio::test]
    async fn test_progress_reports_are_ordered_and_bounded() {
        let session = session();
        let mut reports = Vec::new();
        session
            .regenerate_with_progress(&settings(20), |p| reports.push(p), None)
            .await
            .unwrap();

        assert_eq!(reports.first(), Some(&0.0));
        assert_eq!(reports.last(), Some(&100.0));
        assert!(reports.len() > 2);
        assert!(reports.windows(2).all(|w| w[0] <= w[1]));
        assert!(reports.iter().all(|p| (0.0..=100.0).contains(p)));
    }

    #[tokio::test]
    async fn test_intermediate_snapshots_reach_listeners() {
        let session = session();
        let sizes = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&sizes);
        session
            .store()
            .subscribe(move |state| {
                if let Some(dungeon) = &state.dungeon {
                    seen.lock().unwrap().push(dungeon.rooms.len());
                }
            })
            .unwrap();

        let dungeon = session.regenerate(&settings(20)).await.unwrap();
        let sizes = sizes.lock().unwrap();
        assert!(sizes.len() > 1);
        assert_eq!(sizes.last(), Some(&dungeon.rooms.len()));
    }

    #[tokio::test]
    async fn test_cancelled_regeneration_still_completes_progress() {
        let session = session();
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut last = 0.0;
        let dungeon = session
            .regenerate_with_progress(&settings(20), |p| last = p, Some(&cancel))
            .await
            .unwrap();
        assert_eq!(dungeon.rooms.len(), 1);
        assert_eq!(last, 100.0);
    }

    #[tokio::test]
    async fn test_invalid_settings() {
        let session = session();
        let result = session.regenerate(&settings(10_000)).await;
        assert!(matches!(result, Err(DungeonError::InvalidOptions { .. })));
        assert!(session.store().dungeon().unwrap().is_none());
    }

    #[test]
    fn test_grow_without_dungeon() {
        assert!(matches!(session().grow_around(1, 1), Err(DungeonError::NoDungeon)));
        assert!(matches!(session().room_at(Position::new(0.0, 0.0)), Err(DungeonError::NoDungeon)));
    }

    #[tokio::test]
    async fn test_grow_around_keeps_journey() {
        let session = session();
        let before = session.regenerate(&settings(5)).await.unwrap();
        session.store().dispatch(JourneyAction::Initialise).unwrap();
        let journey = session.store().get_state().unwrap();

        let target = before.rooms.last().unwrap().id;
        let grown = session.grow_around(target, 1).unwrap();
        assert!(grown.rooms.len() >= before.rooms.len());
        assert!(grown.id_inc >= before.id_inc);

        let after = session.store().get_state().unwrap();
        assert_eq!(after.current_room_id, journey.current_room_id);
        assert_eq!(after.visited_room_ids, journey.visited_room_ids);
        assert_eq!(after.dungeon.unwrap().rooms.len(), grown.rooms.len());
    }

    #[tokio::test]
    async fn test_grow_around_unknown_room() {
        let session = session();
        session.regenerate(&settings(5)).await.unwrap();
        assert!(matches!(
            session.grow_around(9999, 0),
            Err(DungeonError::RoomNotFound(9999))
        ));
    }

    #[tokio::test]
    async fn test_room_at_and_export() {
        let session = session();
        let dungeon = session.regenerate(&settings(5)).await.unwrap();
        assert_eq!(session.room_at(Position::new(0.0, 0.0)).unwrap(), Some(1));
        assert_eq!(session.room_at(Position::new(5000.0, 5000.0)).unwrap(), None);

        let json = session.export_json().unwrap();
        let parsed: DungeonData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.rooms.len(), dungeon.rooms.len());
        assert_eq!(parsed.doors.len(), dungeon.doors.len());
        assert_eq!(parsed.id_inc, dungeon.id_inc);
    }
}
