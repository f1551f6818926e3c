/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The local mirror of the remote collection (collection.rs)
/// - The admin collection controller (admin.rs)
/// - The public gallery (gallery.rs)
/// - Session credential storage and the admin guard (session.rs)
/// - The login form (login.rs)
/// - Transient notifications (notification.rs)

pub mod admin;
pub mod collection;
pub mod data;
pub mod gallery;
pub mod login;
pub mod notification;
pub mod session;
