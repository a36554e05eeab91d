//! Pure bucket resolution and virtual-bucket path routing
//!
//! Read routing probes sources in `sort_order` ascending and takes the
//! first whose mount point prefixes the path, so an earlier source
//! shadows later ones on a mount-point collision. Write routing picks
//! the source with the longest matching mount point and falls back to
//! the first source when nothing matches.

use serde::Serialize;

use super::entities::VirtualBucketSource;

/// Result of resolving a logical bucket name
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Resolved {
    /// Standard bucket: one physical location
    Physical {
        provider_id: uuid::Uuid,
        remote_bucket_name: String,
    },
    /// Virtual bucket: sources ordered by `sort_order` ascending
    Virtual { sources: Vec<VirtualBucketSource> },
}

/// Whether `mount_point` covers `path`.
///
/// An empty mount point covers everything (the source is mounted at the
/// virtual bucket root). Mount points are compared as path segments, so
/// `a/` covers `a/x.exr` but `plates` does not cover `plates2/x.exr`.
fn mount_covers(mount_point: &str, path: &str) -> bool {
    let mount = mount_point.trim_end_matches('/');
    if mount.is_empty() {
        return true;
    }
    match path.strip_prefix(mount) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Pick the source a read of `path` is served from.
///
/// `sources` must be ordered by `sort_order` ascending; the first
/// covering mount point wins. `None` when no source covers the path.
pub fn route_read<'a>(
    sources: &'a [VirtualBucketSource],
    path: &str,
) -> Option<&'a VirtualBucketSource> {
    sources.iter().find(|s| mount_covers(&s.mount_point, path))
}

/// Pick the source a write to `path` lands in.
///
/// The longest covering mount point wins (most specific mount); with no
/// covering mount point the write falls back to the first source.
/// `None` only when there are no sources at all.
pub fn route_write<'a>(
    sources: &'a [VirtualBucketSource],
    path: &str,
) -> Option<&'a VirtualBucketSource> {
    sources
        .iter()
        .filter(|s| mount_covers(&s.mount_point, path))
        .max_by_key(|s| s.mount_point.trim_end_matches('/').len())
        .or_else(|| sources.first())
}

/// Translate a virtual-bucket path into the path within the chosen
/// source's physical bucket: strip the mount point, prepend the source
/// prefix.
pub fn translate_path(source: &VirtualBucketSource, path: &str) -> String {
    let mount = source.mount_point.trim_end_matches('/');
    let relative = if mount.is_empty() {
        path
    } else {
        path.strip_prefix(mount)
            .map(|rest| rest.trim_start_matches('/'))
            .unwrap_or(path)
    };

    let prefix = source.source_prefix.trim_end_matches('/');
    if prefix.is_empty() {
        relative.to_string()
    } else if relative.is_empty() {
        format!("{}/", prefix)
    } else {
        format!("{}/{}", prefix, relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn source(mount_point: &str, sort_order: i32) -> VirtualBucketSource {
        VirtualBucketSource {
            id: Uuid::new_v4(),
            org_id: Uuid::new_v4(),
            virtual_bucket_name: "all-shots".into(),
            source_bucket_name: format!("src-{}", sort_order),
            source_prefix: String::new(),
            display_name: None,
            mount_point: mount_point.into(),
            sort_order,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_read_routes_to_first_covering_mount() {
        let sources = vec![source("a/", 0), source("b/", 1)];
        let hit = route_read(&sources, "b/file.txt").unwrap();
        assert_eq!(hit.sort_order, 1);
        let hit = route_read(&sources, "a/file.txt").unwrap();
        assert_eq!(hit.sort_order, 0);
    }

    #[test]
    fn test_read_earlier_source_shadows_on_collision() {
        let sources = vec![source("plates/", 0), source("plates/", 1)];
        let hit = route_read(&sources, "plates/sh010.exr").unwrap();
        assert_eq!(hit.sort_order, 0);
    }

    #[test]
    fn test_read_misses_when_nothing_covers() {
        let sources = vec![source("a/", 0), source("b/", 1)];
        assert!(route_read(&sources, "c/file.txt").is_none());
    }

    #[test]
    fn test_root_mount_covers_everything() {
        let sources = vec![source("", 0)];
        assert!(route_read(&sources, "anything/anywhere.exr").is_some());
    }

    #[test]
    fn test_mount_matches_whole_segments_only() {
        let sources = vec![source("plates", 0)];
        assert!(route_read(&sources, "plates/x.exr").is_some());
        assert!(route_read(&sources, "plates2/x.exr").is_none());
    }

    #[test]
    fn test_write_falls_back_to_first_source() {
        let sources = vec![source("a/", 0), source("b/", 1)];
        let hit = route_write(&sources, "c/new-file.txt").unwrap();
        assert_eq!(hit.sort_order, 0);
    }

    #[test]
    fn test_write_routes_by_longest_mount() {
        let sources = vec![source("", 0), source("renders/comp/", 1), source("renders/", 2)];
        let hit = route_write(&sources, "renders/comp/sh010.exr").unwrap();
        assert_eq!(hit.sort_order, 1);
        let hit = route_write(&sources, "renders/sh010.exr").unwrap();
        assert_eq!(hit.sort_order, 2);
        let hit = route_write(&sources, "plates/sh010.exr").unwrap();
        assert_eq!(hit.sort_order, 0);
    }

    #[test]
    fn test_write_with_no_sources_is_none() {
        assert!(route_write(&[], "file.txt").is_none());
    }

    #[test]
    fn test_translate_path_strips_mount_and_adds_prefix() {
        let mut s = source("renders/", 0);
        s.source_prefix = "show/seq".into();
        assert_eq!(translate_path(&s, "renders/sh010.exr"), "show/seq/sh010.exr");

        s.source_prefix = String::new();
        assert_eq!(translate_path(&s, "renders/sh010.exr"), "sh010.exr");
    }

    #[test]
    fn test_translate_path_root_mount() {
        let mut s = source("", 0);
        s.source_prefix = "archive".into();
        assert_eq!(translate_path(&s, "sh010.exr"), "archive/sh010.exr");
    }
}
