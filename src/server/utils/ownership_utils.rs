use crate::server::error::{AppResult, Error};

/// turns a lookup result into the resource, 404 when it doesn't exist
pub fn require_found<T>(resource: Option<T>, resource_name: &str) -> AppResult<T> {
    resource.ok_or_else(|| Error::NotFound(format!("{} not found", resource_name)))
}

/// same as require_found but the caller also has to pass `is_owner`, every mutating endpoint
/// on user content goes through here instead of checking user ids by hand
pub fn require_owned<T>(
    resource: Option<T>,
    resource_name: &str,
    is_owner: impl FnOnce(&T) -> bool,
) -> AppResult<T> {
    let resource = require_found(resource, resource_name)?;

    if !is_owner(&resource) {
        return Err(Error::Forbidden(format!(
            "you can only modify your own {}",
            resource_name
        )));
    }

    Ok(resource)
}
