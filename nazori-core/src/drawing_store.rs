//! # Drawing store
//!
//! The active profile's drawings, which one is selected, and the pen style. Everything the store
//! changes is persisted right away; a failed save is logged and kept in [`DrawingStore::error`]
//! until someone takes it, but does not roll back the in-memory change.

use std::sync::Arc;

use crate::{
    geometry::Size,
    io::{Blob, CodecError, EMPTY_CANVAS_SIZE},
    repositories::{DrawingRepository, DrawingStyleRepository, ProfileRepository},
    state::{Drawing, DrawingId, Profile},
    store::{SharedStore, StoreError},
    style::{DrawingStyle, DrawingStyleRecord, StylePatch, StylePreferences},
};

#[derive(thiserror::Error, Debug, Clone)]
pub enum DrawingStoreError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to prepare blank image: {0}")]
    Codec(Arc<CodecError>),
    #[error("no drawing is selected")]
    NoSelection,
    #[error("drawing {0} does not exist")]
    MissingDrawing(DrawingId),
}
impl From<CodecError> for DrawingStoreError {
    fn from(value: CodecError) -> Self {
        Self::Codec(Arc::new(value))
    }
}

pub struct DrawingStore {
    profiles: ProfileRepository,
    drawing_repository: DrawingRepository,
    styles: DrawingStyleRepository,

    profile: Profile,
    style_record: DrawingStyleRecord,
    /// Session only. Never reaches `style_record`.
    is_eraser: bool,
    /// Newest first.
    drawings: Vec<Drawing>,
    current: Option<DrawingId>,
    error: Option<DrawingStoreError>,
}
impl DrawingStore {
    /// Load the most recent profile with its style and drawings, creating the profile and style
    /// record if there are none yet. Nothing is selected afterwards.
    /// # Errors
    /// Storage failures. There is nothing to fall back to in that case.
    pub async fn load(store: SharedStore) -> Result<Self, DrawingStoreError> {
        let profiles = ProfileRepository::new(store.clone());
        let drawing_repository = DrawingRepository::new(store.clone());
        let styles = DrawingStyleRepository::new(store);

        let profile = match profiles.get_first().await? {
            Some(profile) => profile,
            None => {
                log::info!("No profile found, creating one");
                profiles.create(None).await?
            }
        };
        let style_record = match styles.get_by_profile_id(profile.id).await? {
            Some(record) => record,
            None => {
                styles
                    .create(profile.id, StylePreferences::default())
                    .await?
            }
        };
        let drawings = drawing_repository.get_by_profile_id(profile.id).await?;
        log::info!(
            "Loaded profile {} ({}) with {} drawings",
            profile.id,
            profile.display_name(),
            drawings.len()
        );

        Ok(Self {
            profiles,
            drawing_repository,
            styles,
            profile,
            style_record,
            is_eraser: false,
            drawings,
            current: None,
            error: None,
        })
    }
    /// Log and keep a failure, then hand it back.
    fn note<T>(&mut self, result: Result<T, DrawingStoreError>) -> Result<T, DrawingStoreError> {
        if let Err(e) = &result {
            log::warn!("Drawing store operation failed: {e}");
            self.error = Some(e.clone());
        }
        result
    }
    #[must_use]
    pub fn profile(&self) -> &Profile {
        &self.profile
    }
    /// Newest first.
    #[must_use]
    pub fn drawings(&self) -> &[Drawing] {
        &self.drawings
    }
    #[must_use]
    pub fn current_drawing_id(&self) -> Option<DrawingId> {
        self.current
    }
    #[must_use]
    pub fn current_drawing(&self) -> Option<&Drawing> {
        let current = self.current?;
        self.drawings.iter().find(|drawing| drawing.id == current)
    }
    /// Persisted preferences merged with the session eraser flag.
    #[must_use]
    pub fn drawing_style(&self) -> DrawingStyle {
        self.style_record.style.with_eraser(self.is_eraser)
    }
    /// The last failure, if it hasn't been taken yet.
    #[must_use]
    pub fn error(&self) -> Option<&DrawingStoreError> {
        self.error.as_ref()
    }
    pub fn take_error(&mut self) -> Option<DrawingStoreError> {
        self.error.take()
    }

    /// Persist a new blank drawing, put it at the front of the list and select it.
    /// # Errors
    /// If it couldn't be saved. Nothing changes in that case.
    pub async fn create_drawing(&mut self) -> Result<Drawing, DrawingStoreError> {
        let result = async {
            let blank = Blob::blank(Size::new(EMPTY_CANVAS_SIZE, EMPTY_CANVAS_SIZE))?;
            let drawing = self.drawing_repository.create(self.profile.id, blank).await?;
            Ok::<_, DrawingStoreError>(drawing)
        }
        .await;
        let drawing = self.note(result)?;
        self.drawings.insert(0, drawing.clone());
        self.current = Some(drawing.id);
        Ok(drawing)
    }
    /// Make `id` the active drawing. Drawing it onto the canvas and giving it a fresh history is
    /// up to the caller.
    /// # Errors
    /// If `id` isn't one of this profile's drawings.
    pub fn select_drawing(&mut self, id: DrawingId) -> Result<&Drawing, DrawingStoreError> {
        let Some(index) = self.drawings.iter().position(|drawing| drawing.id == id) else {
            return Err(DrawingStoreError::MissingDrawing(id));
        };
        self.current = Some(id);
        Ok(&self.drawings[index])
    }
    /// Save `image` as the active drawing's picture.
    /// # Errors
    /// Nothing selected, the drawing vanished from storage, or storage failures.
    pub async fn update_current_drawing(&mut self, image: Blob) -> Result<(), DrawingStoreError> {
        let result = match self.current {
            None => Err(DrawingStoreError::NoSelection),
            Some(id) => match self.drawing_repository.update_image(id, image).await {
                Ok(Some(updated)) => Ok(updated),
                Ok(None) => Err(DrawingStoreError::MissingDrawing(id)),
                Err(e) => Err(e.into()),
            },
        };
        let updated = self.note(result)?;
        if let Some(entry) = self
            .drawings
            .iter_mut()
            .find(|drawing| drawing.id == updated.id)
        {
            *entry = updated;
        }
        Ok(())
    }
    /// Delete a drawing. Deleting the active one leaves nothing selected.
    /// # Errors
    /// Storage failures. The drawing stays listed in that case.
    pub async fn delete_drawing(&mut self, id: DrawingId) -> Result<(), DrawingStoreError> {
        let result = self
            .drawing_repository
            .delete(id)
            .await
            .map_err(DrawingStoreError::from);
        self.note(result)?;
        self.drawings.retain(|drawing| drawing.id != id);
        if self.current == Some(id) {
            self.current = None;
        }
        Ok(())
    }
    /// Change the pen. The eraser flag is applied locally only; every other field is saved to the
    /// profile's style record.
    /// # Errors
    /// Storage failures. The new style is still in effect for this session.
    pub async fn update_style(&mut self, patch: StylePatch) -> Result<(), DrawingStoreError> {
        let (eraser, rest) = patch.split_eraser();
        if let Some(eraser) = eraser {
            self.is_eraser = eraser;
        }
        let Some(rest) = rest else {
            return Ok(());
        };
        let preferences = rest.merge_into(self.style_record.style);
        self.style_record.style = preferences;

        let result = match self.styles.update(self.style_record.id, preferences).await {
            Ok(Some(record)) => Ok(record),
            // Record went missing underneath us. Start a new one.
            Ok(None) => self
                .styles
                .create(self.profile.id, preferences)
                .await
                .map_err(DrawingStoreError::from),
            Err(e) => Err(e.into()),
        };
        self.style_record = self.note(result)?;
        Ok(())
    }
    /// # Errors
    /// Storage failures.
    pub async fn update_profile_name(&mut self, name: Option<String>) -> Result<(), DrawingStoreError> {
        let result = self
            .profiles
            .update(self.profile.id, name)
            .await
            .map_err(DrawingStoreError::from);
        if let Some(profile) = self.note(result)? {
            self.profile = profile;
        }
        Ok(())
    }
}
