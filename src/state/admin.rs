/// Admin collection controller
///
/// Owns the admin panel's mirror of the remote collection. Every mutation
/// is sent to the service first; the mirror is patched only once the service
/// has confirmed it, so a failed call never leaves a phantom entry behind.
///
/// The controller never performs I/O itself. Each operation returns an
/// `Effect` for the shell to run, and the outcome comes back as an
/// `AdminEvent`.
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::collection::{ImageCollection, LoadStatus, Presentation};
use super::data::{Image, ImageId, UploadFile};
use super::notification::{Notification, NotificationSlot};
use super::session::{Credential, Route, SessionStore};
use crate::error::{ApiError, UploadError};
use crate::remote::ImageApi;

/// Kind of mutation currently waiting on the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
    Delete,
}

/// Title being composed, and the record it targets when editing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub target: Option<ImageId>,
    pub title: String,
}

impl Draft {
    pub fn is_editing(&self) -> bool {
        self.target.is_some()
    }

    fn clear(&mut self) {
        self.target = None;
        self.title.clear();
    }
}

/// A call the shell must issue against the service
#[derive(Debug, Clone)]
pub enum RemoteCall {
    List,
    Create {
        credential: Credential,
        title: String,
        file: UploadFile,
    },
    UpdateTitle {
        credential: Credential,
        id: ImageId,
        title: String,
    },
    Delete {
        credential: Credential,
        id: ImageId,
    },
}

impl RemoteCall {
    /// Run the call and turn its outcome into the event the controller expects
    pub async fn execute(self, api: &dyn ImageApi) -> AdminEvent {
        match self {
            RemoteCall::List => AdminEvent::Listed(api.list().await),
            RemoteCall::Create {
                credential,
                title,
                file,
            } => AdminEvent::Created(api.create(&credential, &title, file).await),
            RemoteCall::UpdateTitle {
                credential,
                id,
                title,
            } => {
                let result = api.update_title(&credential, &id, &title).await;
                AdminEvent::Updated { id, title, result }
            }
            RemoteCall::Delete { credential, id } => {
                let result = api.delete(&credential, &id).await;
                AdminEvent::Deleted { id, result }
            }
        }
    }
}

/// Timer behind `Effect::ExpireNotification`
pub async fn expire_notification(generation: u64, after: Duration) -> AdminEvent {
    tokio::time::sleep(after).await;
    AdminEvent::NotificationExpired(generation)
}

/// Work the controller hands back to the shell
#[derive(Debug, Clone)]
pub enum Effect {
    None,
    /// Issue a remote call and feed its event back
    Call(RemoteCall),
    /// Ask the user to confirm deleting this image
    Confirm(ImageId),
    /// Deliver `NotificationExpired(generation)` after the delay
    ExpireNotification { generation: u64, after: Duration },
    Navigate(Route),
}

/// Inputs to the controller: user actions and remote completions
#[derive(Debug, Clone)]
pub enum AdminEvent {
    TitleChanged(String),
    FileSelected(Result<UploadFile, UploadError>),
    Submit,
    BeginEdit(ImageId),
    CancelEdit,
    DeleteRequested(ImageId),
    DeleteAnswered { id: ImageId, confirmed: bool },
    Retry,
    ToggleSidebar,
    Logout,
    NotificationExpired(u64),
    Listed(Result<Vec<Image>, ApiError>),
    Created(Result<Image, ApiError>),
    Updated {
        id: ImageId,
        title: String,
        result: Result<(), ApiError>,
    },
    Deleted {
        id: ImageId,
        result: Result<(), ApiError>,
    },
}

pub struct AdminController {
    session: Arc<dyn SessionStore>,
    collection: ImageCollection,
    status: LoadStatus,
    draft: Draft,
    selected_file: Option<UploadFile>,
    in_flight: Option<Mutation>,
    notifications: NotificationSlot,
    notification_ttl: Duration,
    sidebar_open: bool,
}

impl AdminController {
    /// Create a controller for an admitted session.
    /// Call `load` to fetch the collection.
    pub fn new(session: Arc<dyn SessionStore>, notification_ttl: Duration) -> Self {
        Self {
            session,
            collection: ImageCollection::new(),
            status: LoadStatus::Loading,
            draft: Draft::default(),
            selected_file: None,
            in_flight: None,
            notifications: NotificationSlot::default(),
            notification_ttl,
            sidebar_open: true,
        }
    }

    pub fn collection(&self) -> &ImageCollection {
        &self.collection
    }

    #[cfg(test)]
    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn presentation(&self) -> Presentation {
        self.collection.presentation(&self.status)
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn selected_file(&self) -> Option<&UploadFile> {
        self.selected_file.as_ref()
    }

    /// True while an upload or title update is waiting on the service
    pub fn pending_operation(&self) -> bool {
        matches!(self.in_flight, Some(Mutation::Create | Mutation::Update))
    }

    #[cfg(test)]
    pub fn in_flight(&self) -> Option<Mutation> {
        self.in_flight
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notifications.current()
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn handle(&mut self, event: AdminEvent) -> Effect {
        match event {
            AdminEvent::TitleChanged(title) => {
                self.draft.title = title;
                Effect::None
            }
            AdminEvent::FileSelected(Ok(file)) => {
                debug!("Selected {:?} for upload", file);
                self.selected_file = Some(file);
                Effect::None
            }
            AdminEvent::FileSelected(Err(e)) => {
                warn!("Rejected picked file: {e}");
                self.notify(Notification::error("Please select an image file"))
            }
            AdminEvent::Submit => self.submit(),
            AdminEvent::BeginEdit(id) => {
                match self.collection.get(&id).cloned() {
                    Some(image) => self.begin_edit(&image),
                    None => debug!("Ignoring edit of unknown image {id}"),
                }
                Effect::None
            }
            AdminEvent::CancelEdit => {
                self.cancel_edit();
                Effect::None
            }
            AdminEvent::DeleteRequested(id) => self.request_delete(id),
            AdminEvent::DeleteAnswered { id, confirmed } => self.confirm_delete(id, confirmed),
            AdminEvent::Retry => self.load(),
            AdminEvent::ToggleSidebar => {
                self.sidebar_open = !self.sidebar_open;
                Effect::None
            }
            AdminEvent::Logout => self.logout(),
            AdminEvent::NotificationExpired(generation) => {
                self.notifications.expire(generation);
                Effect::None
            }
            AdminEvent::Listed(result) => {
                self.loaded(result);
                Effect::None
            }
            AdminEvent::Created(result) => self.created(result),
            AdminEvent::Updated { id, title, result } => self.updated(id, title, result),
            AdminEvent::Deleted { id, result } => self.deleted(id, result),
        }
    }

    /// Fetch the authoritative collection.
    /// Refused while a mutation is in flight, since the snapshot could
    /// land after the confirmation and drop the confirmed change.
    pub fn load(&mut self) -> Effect {
        if self.in_flight.is_some() {
            return self.busy();
        }
        self.status = LoadStatus::Loading;
        Effect::Call(RemoteCall::List)
    }

    fn loaded(&mut self, result: Result<Vec<Image>, ApiError>) {
        match result {
            Ok(images) => {
                info!("Loaded {} images", images.len());
                self.collection.replace(images);
                self.status = LoadStatus::Loaded;
            }
            Err(e) => {
                // No notification: the view offers a retry instead
                error!("Error fetching images: {e}");
                self.collection.clear();
                self.status = LoadStatus::Failed(e);
            }
        }
    }

    /// Form submit: update in edit mode, create otherwise
    pub fn submit(&mut self) -> Effect {
        let title = self.draft.title.clone();
        if self.draft.is_editing() {
            self.update(title)
        } else {
            let file = self.selected_file.clone();
            self.create(title, file)
        }
    }

    /// Upload a new image
    pub fn create(&mut self, title: String, file: Option<UploadFile>) -> Effect {
        if self.blocked() {
            return self.busy();
        }
        let Some(file) = file else {
            return self.notify(Notification::error("Please select a file"));
        };
        if title.trim().is_empty() {
            return self.notify(Notification::error("Please enter a title"));
        }
        let Some(credential) = self.credential() else {
            return Effect::Navigate(Route::Login);
        };

        info!("Uploading {:?} as {title:?}", file);
        self.in_flight = Some(Mutation::Create);
        Effect::Call(RemoteCall::Create {
            credential,
            title,
            file,
        })
    }

    fn created(&mut self, result: Result<Image, ApiError>) -> Effect {
        self.finish(Mutation::Create);
        match result {
            Ok(image) => {
                info!("Uploaded image {}", image.id);
                self.collection.push(image);
                self.selected_file = None;
                // An edit started while the upload was running keeps its draft
                if !self.draft.is_editing() {
                    self.draft.clear();
                }
                self.notify(Notification::success("Image uploaded successfully"))
            }
            Err(e) => {
                error!("Error uploading image: {e}");
                self.notify(Notification::error("Error uploading image"))
            }
        }
    }

    /// Enter edit mode for one record. No remote call.
    pub fn begin_edit(&mut self, image: &Image) {
        self.draft = Draft {
            target: Some(image.id.clone()),
            title: image.title.clone(),
        };
    }

    pub fn cancel_edit(&mut self) {
        self.draft.clear();
    }

    /// Rename the record being edited
    pub fn update(&mut self, title: String) -> Effect {
        if self.blocked() {
            return self.busy();
        }
        let Some(id) = self.draft.target.clone() else {
            return self.notify(Notification::error("Select an image to edit"));
        };
        if title.trim().is_empty() {
            return self.notify(Notification::error("Please enter a title"));
        }
        let Some(credential) = self.credential() else {
            return Effect::Navigate(Route::Login);
        };

        info!("Renaming image {id} to {title:?}");
        self.in_flight = Some(Mutation::Update);
        Effect::Call(RemoteCall::UpdateTitle {
            credential,
            id,
            title,
        })
    }

    fn updated(&mut self, id: ImageId, title: String, result: Result<(), ApiError>) -> Effect {
        self.finish(Mutation::Update);
        match result {
            Ok(()) => {
                if !self.collection.rename(&id, &title) {
                    warn!("Updated image {id} is not in the local collection");
                }
                if self.draft.target.as_ref() == Some(&id) {
                    self.draft.clear();
                }
                self.notify(Notification::success("Image updated successfully"))
            }
            Err(e) => {
                // Edit mode and draft stay as they are so the admin can retry
                error!("Error updating image {id}: {e}");
                self.notify(Notification::error("Error updating image"))
            }
        }
    }

    /// Ask for confirmation before deleting. Nothing changes until it is given.
    pub fn request_delete(&mut self, id: ImageId) -> Effect {
        if self.blocked() {
            return self.busy();
        }
        Effect::Confirm(id)
    }

    pub fn confirm_delete(&mut self, id: ImageId, confirmed: bool) -> Effect {
        if !confirmed {
            debug!("Delete of image {id} not confirmed");
            return Effect::None;
        }
        if self.blocked() {
            return self.busy();
        }
        let Some(credential) = self.credential() else {
            return Effect::Navigate(Route::Login);
        };

        info!("Deleting image {id}");
        self.in_flight = Some(Mutation::Delete);
        Effect::Call(RemoteCall::Delete { credential, id })
    }

    fn deleted(&mut self, id: ImageId, result: Result<(), ApiError>) -> Effect {
        self.finish(Mutation::Delete);
        match result {
            Ok(()) => {
                if self.collection.remove(&id).is_none() {
                    warn!("Deleted image {id} is not in the local collection");
                }
                if self.draft.target.as_ref() == Some(&id) {
                    self.draft.clear();
                }
                self.notify(Notification::success("Image deleted successfully"))
            }
            Err(e) => {
                error!("Error deleting image {id}: {e}");
                self.notify(Notification::error("Error deleting image"))
            }
        }
    }

    /// Forget the credential and go back to the public gallery.
    /// If the credential cannot be cleared the panel stays open.
    pub fn logout(&mut self) -> Effect {
        match self.session.clear() {
            Ok(()) => {
                info!("Logged out");
                Effect::Navigate(Route::Gallery)
            }
            Err(e) => {
                error!("Failed to clear session credential: {e}");
                self.notify(Notification::error("Error logging out"))
            }
        }
    }

    fn credential(&self) -> Option<Credential> {
        match self.session.get() {
            Ok(credential) => credential,
            Err(e) => {
                warn!("Failed to read session credential: {e}");
                None
            }
        }
    }

    /// Mutations wait for the running mutation and for the list snapshot
    fn blocked(&self) -> bool {
        self.in_flight.is_some() || self.status.is_loading()
    }

    fn finish(&mut self, mutation: Mutation) {
        if self.in_flight == Some(mutation) {
            self.in_flight = None;
        } else {
            warn!("{mutation:?} completed while {:?} was in flight", self.in_flight);
        }
    }

    fn busy(&mut self) -> Effect {
        self.notify(Notification::error(
            "Please wait for the current operation to finish",
        ))
    }

    fn notify(&mut self, notification: Notification) -> Effect {
        let generation = self.notifications.post(notification);
        Effect::ExpireNotification {
            generation,
            after: self.notification_ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SessionError;
    use crate::remote::fake::{Call, FakeImageApi};
    use crate::state::data::png_bytes;
    use crate::state::notification::{NotificationKind, NOTIFICATION_TTL};
    use crate::state::session::MemorySessionStore;

    const TOKEN: &str = "admin-token";

    /// A store whose credential cannot be cleared
    struct StuckSessionStore(Credential);

    impl SessionStore for StuckSessionStore {
        fn get(&self) -> Result<Option<Credential>, SessionError> {
            Ok(Some(self.0.clone()))
        }

        fn set(&self, _credential: &Credential) -> Result<(), SessionError> {
            Err(SessionError::Poisoned)
        }

        fn clear(&self) -> Result<(), SessionError> {
            Err(SessionError::Poisoned)
        }
    }

    fn image(id: &str, title: &str, url: &str) -> Image {
        Image {
            id: ImageId::new(id),
            title: title.to_string(),
            url: url.to_string(),
        }
    }

    fn upload() -> UploadFile {
        UploadFile::from_bytes("photo.png", png_bytes(4, 4)).unwrap()
    }

    /// Run every remote call the controller asks for until it asks for
    /// something else, and return that.
    async fn drive(
        controller: &mut AdminController,
        api: &FakeImageApi,
        mut effect: Effect,
    ) -> Effect {
        while let Effect::Call(call) = effect {
            let event = call.execute(api).await;
            effect = controller.handle(event);
        }
        effect
    }

    async fn loaded(images: Vec<Image>) -> (AdminController, FakeImageApi) {
        let api = FakeImageApi::new(TOKEN, images);
        let session = Arc::new(MemorySessionStore::with_credential(Credential::new(TOKEN)));
        let mut controller = AdminController::new(session, NOTIFICATION_TTL);
        let effect = controller.load();
        let effect = drive(&mut controller, &api, effect).await;
        assert!(matches!(effect, Effect::None));
        (controller, api)
    }

    fn notification(controller: &AdminController) -> Option<(String, NotificationKind)> {
        controller
            .notification()
            .map(|n| (n.text.clone(), n.kind))
    }

    #[tokio::test]
    async fn test_load_replaces_collection() {
        let (controller, api) = loaded(vec![image("1", "Sunset", "/a.jpg")]).await;
        assert!(!controller.is_loading());
        assert_eq!(controller.status(), &LoadStatus::Loaded);
        assert_eq!(controller.collection().as_slice(), api.images().as_slice());
        assert_eq!(controller.presentation(), Presentation::Images);
    }

    #[tokio::test]
    async fn test_load_twice_yields_same_collection() {
        let (mut controller, api) =
            loaded(vec![image("1", "Sunset", "/a.jpg"), image("2", "Beach", "/b.jpg")]).await;
        let first = controller.collection().clone();

        let effect = controller.load();
        drive(&mut controller, &api, effect).await;

        assert_eq!(controller.collection(), &first);
        assert_eq!(api.calls(), vec![Call::List, Call::List]);
    }

    #[tokio::test]
    async fn test_load_failure_is_silent_and_empty() {
        let api = FakeImageApi::new(TOKEN, vec![image("1", "Sunset", "/a.jpg")]);
        api.set_failing(true);
        let session = Arc::new(MemorySessionStore::with_credential(Credential::new(TOKEN)));
        let mut controller = AdminController::new(session, NOTIFICATION_TTL);

        let effect = controller.load();
        drive(&mut controller, &api, effect).await;

        assert!(!controller.is_loading());
        assert!(controller.collection().is_empty());
        assert!(controller.notification().is_none());
        assert_eq!(controller.presentation(), Presentation::Empty { retry: true });

        api.set_failing(false);
        let effect = controller.handle(AdminEvent::Retry);
        drive(&mut controller, &api, effect).await;
        assert_eq!(controller.collection().len(), 1);
    }

    #[tokio::test]
    async fn test_create_appends_server_record() {
        let (mut controller, api) = loaded(vec![image("1", "Sunset", "/a.jpg")]).await;

        controller.handle(AdminEvent::TitleChanged("Harbour".to_string()));
        controller.handle(AdminEvent::FileSelected(Ok(upload())));
        let effect = controller.handle(AdminEvent::Submit);
        assert!(controller.pending_operation());

        let effect = drive(&mut controller, &api, effect).await;

        assert_eq!(controller.collection().len(), 2);
        let created = controller.collection().as_slice().last().unwrap().clone();
        assert_eq!(&created, api.images().last().unwrap());
        assert_eq!(created.title, "Harbour");
        assert_eq!(controller.collection().as_slice(), api.images().as_slice());

        assert!(!controller.pending_operation());
        assert!(controller.selected_file().is_none());
        assert_eq!(controller.draft(), &Draft::default());
        assert_eq!(
            notification(&controller),
            Some(("Image uploaded successfully".to_string(), NotificationKind::Success))
        );
        assert!(matches!(
            effect,
            Effect::ExpireNotification { after, .. } if after == Duration::from_secs(3)
        ));
    }

    #[tokio::test]
    async fn test_create_with_empty_title_issues_no_call() {
        let (mut controller, api) = loaded(vec![image("1", "Sunset", "/a.jpg")]).await;
        let before = controller.collection().clone();

        let effect = controller.create(String::new(), Some(upload()));
        let effect = drive(&mut controller, &api, effect).await;

        assert!(matches!(effect, Effect::ExpireNotification { .. }));
        assert_eq!(api.calls(), vec![Call::List]);
        assert_eq!(controller.collection(), &before);
        assert_eq!(
            notification(&controller),
            Some(("Please enter a title".to_string(), NotificationKind::Error))
        );

        controller.create("   ".to_string(), Some(upload()));
        assert_eq!(api.calls(), vec![Call::List]);
    }

    #[tokio::test]
    async fn test_create_without_file_issues_no_call() {
        let (mut controller, api) = loaded(vec![]).await;

        let effect = controller.create("Sunset".to_string(), None);
        drive(&mut controller, &api, effect).await;

        assert_eq!(api.calls(), vec![Call::List]);
        assert!(controller.collection().is_empty());
        assert_eq!(
            notification(&controller),
            Some(("Please select a file".to_string(), NotificationKind::Error))
        );
    }

    #[tokio::test]
    async fn test_create_failure_leaves_collection() {
        let (mut controller, api) = loaded(vec![image("1", "Sunset", "/a.jpg")]).await;
        api.set_failing(true);

        let effect = controller.create("Harbour".to_string(), Some(upload()));
        drive(&mut controller, &api, effect).await;

        assert_eq!(controller.collection().len(), 1);
        assert!(!controller.pending_operation());
        assert_eq!(
            notification(&controller),
            Some(("Error uploading image".to_string(), NotificationKind::Error))
        );
    }

    #[tokio::test]
    async fn test_stale_token_surfaces_as_error() {
        let api = FakeImageApi::new(TOKEN, vec![]);
        let session = Arc::new(MemorySessionStore::with_credential(Credential::new("expired")));
        let mut controller = AdminController::new(session, NOTIFICATION_TTL);
        let effect = controller.load();
        drive(&mut controller, &api, effect).await;

        let effect = controller.create("Harbour".to_string(), Some(upload()));
        drive(&mut controller, &api, effect).await;

        assert!(controller.collection().is_empty());
        assert!(api.images().is_empty());
        assert_eq!(
            notification(&controller),
            Some(("Error uploading image".to_string(), NotificationKind::Error))
        );
    }

    #[tokio::test]
    async fn test_update_patches_title_in_place() {
        let (mut controller, api) = loaded(vec![image("1", "Sunset", "/a.jpg")]).await;

        controller.handle(AdminEvent::BeginEdit(ImageId::new("1")));
        assert_eq!(
            controller.draft(),
            &Draft {
                target: Some(ImageId::new("1")),
                title: "Sunset".to_string()
            }
        );

        let effect = controller.update("Sunrise".to_string());
        drive(&mut controller, &api, effect).await;

        assert_eq!(
            controller.collection().as_slice(),
            &[image("1", "Sunrise", "/a.jpg")]
        );
        assert!(!controller.draft().is_editing());
        assert_eq!(
            notification(&controller),
            Some(("Image updated successfully".to_string(), NotificationKind::Success))
        );
    }

    #[tokio::test]
    async fn test_update_changes_exactly_one_record() {
        let images = vec![
            image("1", "Sunset", "/a.jpg"),
            image("2", "Beach", "/b.jpg"),
            image("3", "Forest", "/c.jpg"),
        ];
        let (mut controller, api) = loaded(images.clone()).await;

        controller.handle(AdminEvent::BeginEdit(ImageId::new("2")));
        controller.handle(AdminEvent::TitleChanged("Harbour".to_string()));
        let effect = controller.handle(AdminEvent::Submit);
        drive(&mut controller, &api, effect).await;

        let after = controller.collection().as_slice();
        assert_eq!(after[0], images[0]);
        assert_eq!(after[1], image("2", "Harbour", "/b.jpg"));
        assert_eq!(after[2], images[2]);
        assert_eq!(after, api.images().as_slice());
    }

    #[tokio::test]
    async fn test_update_failure_keeps_edit_mode() {
        let (mut controller, api) = loaded(vec![image("1", "Sunset", "/a.jpg")]).await;
        controller.handle(AdminEvent::BeginEdit(ImageId::new("1")));
        controller.handle(AdminEvent::TitleChanged("Sunrise".to_string()));
        api.set_failing(true);

        let effect = controller.handle(AdminEvent::Submit);
        drive(&mut controller, &api, effect).await;

        assert_eq!(controller.collection().as_slice(), &[image("1", "Sunset", "/a.jpg")]);
        assert_eq!(
            controller.draft(),
            &Draft {
                target: Some(ImageId::new("1")),
                title: "Sunrise".to_string()
            }
        );
        assert_eq!(
            notification(&controller),
            Some(("Error updating image".to_string(), NotificationKind::Error))
        );
    }

    #[tokio::test]
    async fn test_update_requires_edit_mode_and_title() {
        let (mut controller, api) = loaded(vec![image("1", "Sunset", "/a.jpg")]).await;

        controller.update("Sunrise".to_string());
        assert_eq!(
            notification(&controller),
            Some(("Select an image to edit".to_string(), NotificationKind::Error))
        );

        controller.handle(AdminEvent::BeginEdit(ImageId::new("1")));
        controller.update("  ".to_string());
        assert_eq!(
            notification(&controller),
            Some(("Please enter a title".to_string(), NotificationKind::Error))
        );
        assert_eq!(api.calls(), vec![Call::List]);
    }

    #[tokio::test]
    async fn test_cancel_edit_clears_draft() {
        let (mut controller, _api) = loaded(vec![image("1", "Sunset", "/a.jpg")]).await;
        controller.handle(AdminEvent::BeginEdit(ImageId::new("1")));
        controller.handle(AdminEvent::CancelEdit);
        assert_eq!(controller.draft(), &Draft::default());
    }

    #[tokio::test]
    async fn test_confirmed_delete_removes_record() {
        let (mut controller, api) =
            loaded(vec![image("1", "Sunset", "/a.jpg"), image("2", "Beach", "/b.jpg")]).await;

        let effect = controller.handle(AdminEvent::DeleteRequested(ImageId::new("1")));
        assert!(matches!(&effect, Effect::Confirm(id) if id == &ImageId::new("1")));
        assert_eq!(api.calls(), vec![Call::List]);

        let effect = controller.handle(AdminEvent::DeleteAnswered {
            id: ImageId::new("1"),
            confirmed: true,
        });
        drive(&mut controller, &api, effect).await;

        assert_eq!(controller.collection().len(), 1);
        assert!(controller.collection().get(&ImageId::new("1")).is_none());
        assert_eq!(controller.collection().as_slice(), api.images().as_slice());
        assert_eq!(
            notification(&controller),
            Some(("Image deleted successfully".to_string(), NotificationKind::Success))
        );
    }

    #[tokio::test]
    async fn test_unconfirmed_delete_changes_nothing() {
        let (mut controller, api) = loaded(vec![image("1", "Sunset", "/a.jpg")]).await;

        controller.handle(AdminEvent::DeleteRequested(ImageId::new("1")));
        let effect = controller.handle(AdminEvent::DeleteAnswered {
            id: ImageId::new("1"),
            confirmed: false,
        });

        assert!(matches!(effect, Effect::None));
        assert_eq!(controller.collection().len(), 1);
        assert_eq!(api.calls(), vec![Call::List]);
        assert!(controller.notification().is_none());
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_record() {
        let (mut controller, api) = loaded(vec![image("1", "Sunset", "/a.jpg")]).await;
        api.set_failing(true);

        let effect = controller.confirm_delete(ImageId::new("1"), true);
        drive(&mut controller, &api, effect).await;

        assert_eq!(controller.collection().len(), 1);
        assert_eq!(controller.in_flight(), None);
        assert_eq!(
            notification(&controller),
            Some(("Error deleting image".to_string(), NotificationKind::Error))
        );
    }

    #[tokio::test]
    async fn test_deleting_edited_record_exits_edit_mode() {
        let (mut controller, api) = loaded(vec![image("1", "Sunset", "/a.jpg")]).await;
        controller.handle(AdminEvent::BeginEdit(ImageId::new("1")));

        let effect = controller.confirm_delete(ImageId::new("1"), true);
        drive(&mut controller, &api, effect).await;

        assert!(!controller.draft().is_editing());
    }

    #[tokio::test]
    async fn test_one_mutation_in_flight_at_a_time() {
        let (mut controller, api) = loaded(vec![image("1", "Sunset", "/a.jpg")]).await;

        let pending = controller.create("Harbour".to_string(), Some(upload()));
        assert_eq!(controller.in_flight(), Some(Mutation::Create));

        let effect = controller.request_delete(ImageId::new("1"));
        assert!(matches!(effect, Effect::ExpireNotification { .. }));
        assert_eq!(
            notification(&controller),
            Some((
                "Please wait for the current operation to finish".to_string(),
                NotificationKind::Error
            ))
        );

        drive(&mut controller, &api, pending).await;
        assert_eq!(controller.in_flight(), None);
        assert!(matches!(
            controller.request_delete(ImageId::new("1")),
            Effect::Confirm(_)
        ));
    }

    #[tokio::test]
    async fn test_stale_expiry_does_not_clear_newer_notification() {
        let (mut controller, _api) = loaded(vec![]).await;

        let Effect::ExpireNotification { generation: first, .. } =
            controller.create("Sunset".to_string(), None)
        else {
            panic!("expected an expiry");
        };
        controller.create(String::new(), Some(upload()));

        controller.handle(AdminEvent::NotificationExpired(first));
        assert_eq!(
            notification(&controller),
            Some(("Please enter a title".to_string(), NotificationKind::Error))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_notification_clears_after_three_seconds() {
        let (mut controller, _api) = loaded(vec![]).await;
        let start = tokio::time::Instant::now();

        let Effect::ExpireNotification { generation, after } =
            controller.create("Sunset".to_string(), None)
        else {
            panic!("expected an expiry");
        };
        assert!(controller.notification().is_some());

        let timer = tokio::spawn(expire_notification(generation, after));
        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert!(!timer.is_finished());
        assert!(controller.notification().is_some());

        let event = timer.await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(3000));
        assert!(matches!(event, AdminEvent::NotificationExpired(g) if g == generation));

        controller.handle(event);
        assert!(controller.notification().is_none());
    }

    #[tokio::test]
    async fn test_mutations_wait_for_initial_load() {
        let api = FakeImageApi::new(TOKEN, vec![image("1", "Sunset", "/a.jpg")]);
        let session = Arc::new(MemorySessionStore::with_credential(Credential::new(TOKEN)));
        let mut controller = AdminController::new(session, NOTIFICATION_TTL);

        let list = controller.load();
        let effect = controller.create("Harbour".to_string(), Some(upload()));
        assert!(matches!(effect, Effect::ExpireNotification { .. }));
        assert_eq!(controller.in_flight(), None);
        assert_eq!(
            notification(&controller),
            Some((
                "Please wait for the current operation to finish".to_string(),
                NotificationKind::Error
            ))
        );
        assert!(matches!(
            controller.request_delete(ImageId::new("1")),
            Effect::ExpireNotification { .. }
        ));

        drive(&mut controller, &api, list).await;
        let effect = controller.create("Harbour".to_string(), Some(upload()));
        drive(&mut controller, &api, effect).await;

        assert_eq!(api.calls().len(), 2);
        assert_eq!(controller.collection().as_slice(), api.images().as_slice());
    }

    #[tokio::test]
    async fn test_retry_waits_for_running_mutation() {
        let (mut controller, api) = loaded(vec![image("1", "Sunset", "/a.jpg")]).await;

        let pending = controller.create("Harbour".to_string(), Some(upload()));
        let effect = controller.handle(AdminEvent::Retry);
        assert!(matches!(effect, Effect::ExpireNotification { .. }));
        assert!(!controller.is_loading());

        drive(&mut controller, &api, pending).await;
        let effect = controller.handle(AdminEvent::Retry);
        drive(&mut controller, &api, effect).await;

        assert_eq!(controller.collection().len(), 2);
        assert_eq!(controller.collection().as_slice(), api.images().as_slice());
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let session = Arc::new(MemorySessionStore::with_credential(Credential::new(TOKEN)));
        let mut controller = AdminController::new(session.clone(), NOTIFICATION_TTL);

        let effect = controller.handle(AdminEvent::Logout);

        assert!(matches!(effect, Effect::Navigate(Route::Gallery)));
        assert_eq!(session.get().unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_credential_sends_to_login() {
        let api = FakeImageApi::new(TOKEN, vec![]);
        let session = Arc::new(MemorySessionStore::new());
        let mut controller = AdminController::new(session, NOTIFICATION_TTL);
        let effect = controller.load();
        drive(&mut controller, &api, effect).await;

        let effect = controller.create("Harbour".to_string(), Some(upload()));
        assert!(matches!(effect, Effect::Navigate(Route::Login)));
        assert_eq!(controller.in_flight(), None);
        assert_eq!(api.calls(), vec![Call::List]);
    }

    #[test]
    fn test_logout_failure_keeps_panel_open() {
        let session = Arc::new(StuckSessionStore(Credential::new(TOKEN)));
        let mut controller = AdminController::new(session.clone(), NOTIFICATION_TTL);

        let effect = controller.handle(AdminEvent::Logout);

        assert!(matches!(effect, Effect::ExpireNotification { .. }));
        assert_eq!(
            notification(&controller),
            Some(("Error logging out".to_string(), NotificationKind::Error))
        );
        assert_eq!(session.get().unwrap(), Some(Credential::new(TOKEN)));
    }

    #[test]
    fn test_rejected_file_is_reported() {
        let session = Arc::new(MemorySessionStore::new());
        let mut controller = AdminController::new(session, NOTIFICATION_TTL);

        controller.handle(AdminEvent::FileSelected(Err(UploadError::NotAnImage)));

        assert!(controller.selected_file().is_none());
        assert_eq!(
            notification(&controller),
            Some(("Please select an image file".to_string(), NotificationKind::Error))
        );
    }

    #[test]
    fn test_sidebar_toggle() {
        let session = Arc::new(MemorySessionStore::new());
        let mut controller = AdminController::new(session, NOTIFICATION_TTL);
        assert!(controller.sidebar_open());
        controller.handle(AdminEvent::ToggleSidebar);
        assert!(!controller.sidebar_open());
    }
}
