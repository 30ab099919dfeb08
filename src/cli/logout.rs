use crate::success;

pub async fn logout() {
    let mut app = super::session_app().await;
    app.logout().await;
    success!("Logged out. Session state cleared.");
}
