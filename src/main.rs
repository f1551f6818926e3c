use std::sync::Arc;

use iced::{Element, Task, Theme};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod remote;
mod state;
mod ui;

use config::Config;
use error::{ApiError, UploadError};
use remote::thumbnail::{self, Thumbnail};
use remote::{HttpImageApi, ImageApi};
use state::admin::{self, AdminController, AdminEvent, Effect};
use state::data::{Image, ImageId, UploadFile};
use state::gallery::GalleryState;
use state::login::LoginForm;
use state::session::{
    self, GuardOutcome, MemorySessionStore, Route, SessionStore, SqliteSessionStore,
};
use ui::thumbnails::ThumbnailCache;

/// Main application state
struct GalleryApp {
    config: Config,
    api: Arc<dyn ImageApi>,
    session: Arc<dyn SessionStore>,
    route: Route,
    gallery: GalleryState,
    login: LoginForm,
    /// Only present while the admin route is active
    admin: Option<AdminController>,
    /// Bumped on every admin activation; completions from an older
    /// activation are dropped
    admin_epoch: u64,
    thumbnails: ThumbnailCache,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    Navigate(Route),
    GalleryLoaded(Result<Vec<Image>, ApiError>),
    GalleryRetry,
    TokenChanged(String),
    LoginSubmitted,
    /// User action in the admin panel
    Admin(AdminEvent),
    /// Background result for the admin activation with this epoch
    AdminTask(u64, AdminEvent),
    PickFile,
    /// None when the picker was cancelled
    FilePicked(Option<Result<UploadFile, UploadError>>),
    ThumbnailLoaded(ImageId, Result<Thumbnail, String>),
}

impl GalleryApp {
    /// Create a new instance of the application, starting on the public gallery
    fn new(
        config: Config,
        api: Arc<dyn ImageApi>,
        session: Arc<dyn SessionStore>,
    ) -> (Self, Task<Message>) {
        let mut app = GalleryApp {
            config,
            api,
            session,
            route: Route::Gallery,
            gallery: GalleryState::new(),
            login: LoginForm::new(),
            admin: None,
            admin_epoch: 0,
            thumbnails: ThumbnailCache::new(),
        };

        let task = app.navigate(Route::Gallery);
        (app, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Navigate(route) => self.navigate(route),
            Message::GalleryLoaded(result) => {
                self.gallery.loaded(result);
                let images = self.gallery.images().as_slice().to_vec();
                self.fetch_thumbnails(&images)
            }
            Message::GalleryRetry => {
                self.gallery.reload();
                self.fetch_gallery()
            }
            Message::TokenChanged(token) => {
                self.login.set_token(token);
                Task::none()
            }
            Message::LoginSubmitted => {
                if self.login.submit(self.session.as_ref()) {
                    self.navigate(Route::Admin)
                } else {
                    Task::none()
                }
            }
            Message::Admin(event) => self.handle_admin(event),
            Message::AdminTask(epoch, event) => {
                if epoch == self.admin_epoch {
                    self.handle_admin(event)
                } else {
                    warn!("Dropping {event:?} from a previous admin session");
                    Task::none()
                }
            }
            Message::PickFile => Task::perform(pick_image_file(), Message::FilePicked),
            Message::FilePicked(Some(result)) => {
                self.handle_admin(AdminEvent::FileSelected(result))
            }
            Message::FilePicked(None) => Task::none(),
            Message::ThumbnailLoaded(id, result) => {
                self.thumbnails.insert(id, result);
                Task::none()
            }
        }
    }

    fn handle_admin(&mut self, event: AdminEvent) -> Task<Message> {
        let Some(admin) = self.admin.as_mut() else {
            warn!("Dropping {event:?}: admin panel is not active");
            return Task::none();
        };

        let effect = admin.handle(event);
        let images = admin.collection().as_slice().to_vec();

        let task = self.run_effect(effect);
        if self.route != Route::Admin {
            return task;
        }

        self.thumbnails.retain(&images);
        Task::batch([task, self.fetch_thumbnails(&images)])
    }

    /// Turn a controller effect into iced work
    fn run_effect(&mut self, effect: Effect) -> Task<Message> {
        let epoch = self.admin_epoch;

        match effect {
            Effect::None => Task::none(),
            Effect::Call(call) => {
                let api = Arc::clone(&self.api);
                Task::perform(
                    async move { call.execute(api.as_ref()).await },
                    move |event| Message::AdminTask(epoch, event),
                )
            }
            Effect::Confirm(id) => Task::perform(confirm_delete(), move |confirmed| {
                Message::AdminTask(
                    epoch,
                    AdminEvent::DeleteAnswered {
                        id: id.clone(),
                        confirmed,
                    },
                )
            }),
            Effect::ExpireNotification { generation, after } => {
                Task::perform(admin::expire_notification(generation, after), move |event| {
                    Message::AdminTask(epoch, event)
                })
            }
            Effect::Navigate(route) => self.navigate(route),
        }
    }

    fn navigate(&mut self, route: Route) -> Task<Message> {
        match route {
            Route::Gallery => {
                self.admin = None;
                self.route = Route::Gallery;
                self.gallery = GalleryState::new();
                self.fetch_gallery()
            }
            Route::Login => {
                self.admin = None;
                self.route = Route::Login;
                self.login = LoginForm::new();
                Task::none()
            }
            Route::Admin => match session::guard(self.session.as_ref()) {
                GuardOutcome::Redirect(to) => self.navigate(to),
                GuardOutcome::Admit(_) => {
                    self.admin_epoch += 1;
                    let ttl = self.config.notification_ttl;
                    let mut admin = AdminController::new(Arc::clone(&self.session), ttl);
                    let effect = admin.load();
                    self.admin = Some(admin);
                    self.route = Route::Admin;
                    self.run_effect(effect)
                }
            },
        }
    }

    fn fetch_gallery(&self) -> Task<Message> {
        let api = Arc::clone(&self.api);
        Task::perform(async move { api.list().await }, Message::GalleryLoaded)
    }

    /// Fetch and shrink images that have no thumbnail yet
    fn fetch_thumbnails(&mut self, images: &[Image]) -> Task<Message> {
        let wanted = self.thumbnails.request(images);
        if wanted.is_empty() {
            return Task::none();
        }

        Task::batch(wanted.into_iter().map(|image| {
            let api = Arc::clone(&self.api);
            let id = image.id.clone();
            Task::perform(
                async move {
                    match api.fetch_image(&image.url).await {
                        Ok(bytes) => thumbnail::make_thumbnail(bytes).await,
                        Err(e) => Err(e.to_string()),
                    }
                },
                move |result| Message::ThumbnailLoaded(id.clone(), result),
            )
        }))
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        match (self.route, &self.admin) {
            (Route::Admin, Some(admin)) => ui::admin::view(admin, &self.thumbnails),
            (Route::Login, _) => ui::login::view(&self.login),
            _ => ui::gallery::view(&self.gallery, &self.thumbnails),
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    let api: Arc<dyn ImageApi> = match HttpImageApi::new(config.api_base_url.clone()) {
        Ok(api) => Arc::new(api),
        Err(e) => {
            error!("Failed to build HTTP client: {e}");
            std::process::exit(1);
        }
    };

    let session = open_session_store(&config);

    info!("🖼️  Image Gallery starting against {}", config.api_base_url);

    iced::application("Image Gallery", GalleryApp::update, GalleryApp::view)
        .theme(GalleryApp::theme)
        .centered()
        .run_with(move || GalleryApp::new(config, api, session))
}

/// Persisted store when allowed and available, in-memory otherwise
fn open_session_store(config: &Config) -> Arc<dyn SessionStore> {
    if !config.persist_session {
        info!("Session persistence disabled, credential kept in memory");
        return Arc::new(MemorySessionStore::new());
    }

    match SqliteSessionStore::open(config.session_db_path.as_deref()) {
        Ok(store) => {
            info!("Session store at {}", store.path().display());
            Arc::new(store)
        }
        Err(e) => {
            warn!("⚠️  Could not open session store ({e}), credential kept in memory");
            Arc::new(MemorySessionStore::new())
        }
    }
}

/// Show the native file picker and read the chosen image
async fn pick_image_file() -> Option<Result<UploadFile, UploadError>> {
    let handle = rfd::AsyncFileDialog::new()
        .set_title("Select an image to upload")
        .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp", "bmp"])
        .pick_file()
        .await?;

    let name = handle.file_name();
    let result = match tokio::fs::read(handle.path()).await {
        Ok(bytes) => UploadFile::from_bytes(name, bytes),
        Err(e) => Err(UploadError::Unreadable(e.to_string())),
    };
    Some(result)
}

/// Destructive-action gate for deletes
async fn confirm_delete() -> bool {
    let answer = rfd::AsyncMessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title("Delete image")
        .set_description("Are you sure you want to delete this image?")
        .set_buttons(rfd::MessageButtons::YesNo)
        .show()
        .await;

    matches!(answer, rfd::MessageDialogResult::Yes)
}
