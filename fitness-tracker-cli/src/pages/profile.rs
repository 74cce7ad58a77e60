use crate::models::User;

/// Label/value pairs shown on the profile screen
pub fn profile_rows(user: &User) -> [(&'static str, String); 3] {
    [
        ("Name", user.name.clone()),
        ("Email", user.email.clone()),
        ("Role", user.role.to_string()),
    ]
}
