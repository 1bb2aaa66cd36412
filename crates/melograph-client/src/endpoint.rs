// SPDX-License-Identifier: GPL-3.0-or-later

//! Endpoint path resolution.

/// Builds the endpoint path for an entity operation.
///
/// Resolution is pure and stable: the same inputs always produce the same
/// path. Resource wrappers pass their entity and operation names
/// explicitly.
///
/// # Example
/// ```
/// # use melograph_client::endpoint;
/// assert_eq!(endpoint("track", "profile"), "track/profile");
/// ```
pub fn endpoint(entity: &str, operation: &str) -> String {
    format!("{}/{}", entity, operation)
}

#[cfg(test)]
mod tests {
    use super::endpoint;

    #[test]
    fn joins_entity_and_operation() {
        assert_eq!(endpoint("track", "profile"), "track/profile");
        assert_eq!(endpoint("genre", "artists"), "genre/artists");
    }

    #[test]
    fn resolution_is_stable() {
        assert_eq!(endpoint("track", "upload"), endpoint("track", "upload"));
    }
}
