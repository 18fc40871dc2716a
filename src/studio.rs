//! Interactive session state around an [`ImageService`].
//!
//! A [`Studio`] holds what the user has typed and uploaded, allows a single
//! request in flight at a time, and keeps the last result.

use crate::data_uri::{DataUri, DEFAULT_MIME_TYPE};
use crate::error::{ReelMindError, Result};
use crate::image::{
    AspectRatio, EditRequest, GeneratedImage, GenerationRequest, ImageFormat, ImageService, Mode,
};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Progress indicator shown while a request is outstanding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingState {
    /// True while a request is in flight.
    pub is_loading: bool,
    /// Status line for the user.
    pub message: String,
}

impl LoadingState {
    /// The loading state shown while a request in `mode` runs.
    pub fn for_mode(mode: Mode) -> Self {
        let message = match mode {
            Mode::Generate => "Initializing neural network...",
            Mode::Edit => "Analyzing visual data...",
        };
        Self {
            is_loading: true,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct SourceImage {
    data: String,
    mime_type: String,
}

#[derive(Debug, Default)]
struct StudioState {
    mode: Mode,
    prompt: String,
    source: Option<SourceImage>,
    aspect_ratio: AspectRatio,
    loading: LoadingState,
    result: Option<GeneratedImage>,
}

/// A single-user generate/edit session.
pub struct Studio<S> {
    service: S,
    state: Mutex<StudioState>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag and loading state however `submit` exits.
struct InFlightGuard<'a, S> {
    studio: &'a Studio<S>,
}

impl<S> Drop for InFlightGuard<'_, S> {
    fn drop(&mut self) {
        self.studio.lock().loading = LoadingState::default();
        self.studio.in_flight.store(false, Ordering::Release);
    }
}

impl<S: ImageService> Studio<S> {
    /// Creates a session in generate mode with a square aspect ratio.
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: Mutex::new(StudioState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Returns the backing service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Switches mode. Clears the prompt and last result but keeps the source image.
    pub fn set_mode(&self, mode: Mode) {
        let mut state = self.lock();
        state.mode = mode;
        state.prompt.clear();
        state.result = None;
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.lock().mode
    }

    /// Replaces the prompt text.
    pub fn set_prompt(&self, prompt: impl Into<String>) {
        self.lock().prompt = prompt.into();
    }

    /// Current prompt text.
    pub fn prompt(&self) -> String {
        self.lock().prompt.clone()
    }

    /// Sets the aspect ratio used by generate mode.
    pub fn set_aspect_ratio(&self, ratio: AspectRatio) {
        self.lock().aspect_ratio = ratio;
    }

    /// Current aspect ratio.
    pub fn aspect_ratio(&self) -> AspectRatio {
        self.lock().aspect_ratio
    }

    /// Sets the source image from a data URI or bare base64 payload.
    ///
    /// An empty MIME type falls back to `image/png`.
    pub fn set_source_image(&self, data: impl Into<String>, mime_type: impl Into<String>) {
        let mime_type = mime_type.into();
        self.lock().source = Some(SourceImage {
            data: data.into(),
            mime_type: if mime_type.is_empty() {
                DEFAULT_MIME_TYPE.to_string()
            } else {
                mime_type
            },
        });
    }

    /// Reads an image file and makes it the source image.
    ///
    /// The format is detected from the file contents, then from its extension.
    /// Files that are neither PNG, JPEG nor WebP are rejected.
    pub async fn load_source_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let format = ImageFormat::from_magic_bytes(&bytes)
            .or_else(|| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .and_then(ImageFormat::from_extension)
            })
            .ok_or_else(|| {
                ReelMindError::InvalidRequest(format!("{} is not an image", path.display()))
            })?;

        let uri = DataUri::from_bytes(format.mime_type(), &bytes);
        tracing::debug!(path = %path.display(), mime_type = uri.mime_type(), "loaded source image");
        self.set_source_image(uri.to_string(), uri.mime_type());
        Ok(())
    }

    /// The current source image as it was set, if any.
    pub fn source_image(&self) -> Option<String> {
        self.lock().source.as_ref().map(|s| s.data.clone())
    }

    /// MIME type of the current source image.
    pub fn source_mime_type(&self) -> String {
        self.lock()
            .source
            .as_ref()
            .map(|s| s.mime_type.clone())
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string())
    }

    /// Current loading indicator.
    pub fn loading(&self) -> LoadingState {
        self.lock().loading.clone()
    }

    /// True while a request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// The most recent successful result.
    pub fn result(&self) -> Option<GeneratedImage> {
        self.lock().result.clone()
    }

    /// Sends the current prompt in the current mode.
    ///
    /// Fails with `InvalidRequest` for a blank prompt or an edit without a
    /// source image, and with `Busy` while another request is outstanding.
    /// Service errors are returned unchanged.
    pub async fn submit(&self) -> Result<GeneratedImage> {
        let (mode, prompt, source, aspect_ratio) = {
            let state = self.lock();
            (
                state.mode,
                state.prompt.clone(),
                state.source.clone(),
                state.aspect_ratio,
            )
        };

        if prompt.trim().is_empty() {
            return Err(ReelMindError::InvalidRequest("prompt is empty".into()));
        }
        if mode == Mode::Edit && source.is_none() {
            return Err(ReelMindError::InvalidRequest(
                "upload an image before editing".into(),
            ));
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ReelMindError::Busy);
        }
        let _guard = InFlightGuard { studio: self };

        {
            let mut state = self.lock();
            state.loading = LoadingState::for_mode(mode);
            state.result = None;
        }

        let outcome = match (mode, source) {
            (Mode::Generate, _) => {
                let request = GenerationRequest::new(prompt).with_aspect_ratio(aspect_ratio);
                self.service.generate(&request).await
            }
            (Mode::Edit, Some(source)) => {
                let request = EditRequest::new(source.data, source.mime_type, prompt);
                self.service.edit(&request).await
            }
            (Mode::Edit, None) => Err(ReelMindError::InvalidRequest(
                "upload an image before editing".into(),
            )),
        };

        match outcome {
            Ok(image) => {
                self.lock().result = Some(image.clone());
                Ok(image)
            }
            Err(e) => {
                tracing::error!(%mode, "request failed: {e}");
                Err(e)
            }
        }
    }
}

impl<S> Studio<S> {
    fn lock(&self) -> MutexGuard<'_, StudioState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct FakeService {
        fail: bool,
        gate: Option<Arc<Notify>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeService {
        async fn respond(&self, call: String, prompt: &str, mode: Mode) -> Result<GeneratedImage> {
            self.calls.lock().unwrap().push(call);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail {
                return Err(ReelMindError::UnexpectedTextResponse("I cannot do that".into()));
            }
            Ok(GeneratedImage::new(DataUri::new("image/png", "QUJD"), prompt, mode))
        }
    }

    #[async_trait]
    impl ImageService for FakeService {
        async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
            let call = format!("generate {} {}", request.aspect_ratio, request.prompt);
            self.respond(call, &request.prompt, Mode::Generate).await
        }

        async fn edit(&self, request: &EditRequest) -> Result<GeneratedImage> {
            let call = format!("edit {} {}", request.mime_type, request.instruction);
            self.respond(call, &request.instruction, Mode::Edit).await
        }

        fn name(&self) -> &str {
            "fake"
        }

        async fn health_check(&self) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_generate_stores_result() {
        let studio = Studio::new(FakeService::default());
        studio.set_prompt("a red kite");
        studio.set_aspect_ratio(AspectRatio::Landscape);

        let image = studio.submit().await.unwrap();

        assert_eq!(image.url(), "data:image/png;base64,QUJD");
        assert_eq!(image.prompt, "a red kite");
        assert_eq!(studio.result().unwrap().id, image.id);
        assert_eq!(
            studio.service().calls.lock().unwrap().as_slice(),
            ["generate 16:9 a red kite"]
        );
        assert_eq!(studio.loading(), LoadingState::default());
        assert!(!studio.is_busy());
    }

    #[tokio::test]
    async fn test_blank_prompt_is_rejected() {
        let studio = Studio::new(FakeService::default());
        studio.set_prompt("   ");

        let err = studio.submit().await.unwrap_err();

        assert!(matches!(err, ReelMindError::InvalidRequest(_)));
        assert!(studio.service().calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_requires_source_image() {
        let studio = Studio::new(FakeService::default());
        studio.set_mode(Mode::Edit);
        studio.set_prompt("add a hat");

        assert!(matches!(
            studio.submit().await,
            Err(ReelMindError::InvalidRequest(_))
        ));

        studio.set_source_image("data:image/jpeg;base64,QUJD", "image/jpeg");
        let image = studio.submit().await.unwrap();
        assert_eq!(image.mode, Mode::Edit);
        assert_eq!(
            studio.service().calls.lock().unwrap().as_slice(),
            ["edit image/jpeg add a hat"]
        );
    }

    #[tokio::test]
    async fn test_mode_change_keeps_source_image() {
        let studio = Studio::new(FakeService::default());
        studio.set_source_image("QUJD", "");
        studio.set_prompt("a cat");
        studio.submit().await.unwrap();

        studio.set_mode(Mode::Edit);

        assert_eq!(studio.prompt(), "");
        assert!(studio.result().is_none());
        assert_eq!(studio.source_image().as_deref(), Some("QUJD"));
        assert_eq!(studio.source_mime_type(), "image/png");
    }

    #[tokio::test]
    async fn test_failure_clears_loading_and_keeps_error() {
        let studio = Studio::new(FakeService {
            fail: true,
            ..Default::default()
        });
        studio.set_prompt("a cat");

        let err = studio.submit().await.unwrap_err();

        assert!(matches!(err, ReelMindError::UnexpectedTextResponse(ref t) if t == "I cannot do that"));
        assert!(!studio.loading().is_loading);
        assert!(studio.result().is_none());
        assert!(!studio.is_busy());
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_busy() {
        let gate = Arc::new(Notify::new());
        let studio = Arc::new(Studio::new(FakeService {
            gate: Some(gate.clone()),
            ..Default::default()
        }));
        studio.set_prompt("a slow render");

        let first = tokio::spawn({
            let studio = studio.clone();
            async move { studio.submit().await }
        });

        while !studio.is_busy() {
            tokio::task::yield_now().await;
        }
        let loading = studio.loading();
        assert!(loading.is_loading);
        assert_eq!(loading.message, "Initializing neural network...");
        assert!(matches!(studio.submit().await, Err(ReelMindError::Busy)));

        gate.notify_one();
        first.await.unwrap().unwrap();
        assert!(!studio.is_busy());
        assert_eq!(studio.service().calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_load_source_file() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("photo.bin");
        std::fs::write(&png, [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0]).unwrap();
        let text = dir.path().join("notes.txt");
        std::fs::write(&text, "hello").unwrap();

        let studio = Studio::new(FakeService::default());
        studio.load_source_file(&png).await.unwrap();
        assert_eq!(studio.source_mime_type(), "image/png");
        assert!(studio
            .source_image()
            .unwrap()
            .starts_with("data:image/png;base64,"));

        assert!(matches!(
            studio.load_source_file(&text).await,
            Err(ReelMindError::InvalidRequest(_))
        ));
    }
}
