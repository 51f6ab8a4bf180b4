use std::path::Path;

use wordmap_core::{new_id, now_millis};

use crate::model::UserView;
use crate::service::{WordMapError, WordMapService};

/// URL prefix under which uploaded pictures are served.
pub const UPLOAD_URL_PREFIX: &str = "/uploads/";

/// Attempts at finding a free stored name before giving up.
const NAME_ATTEMPTS: usize = 4;

/// Stored file name: upload time in millis, a random suffix, and the
/// original extension.
fn picture_name(original_name: Option<&str>) -> String {
    let ext = original_name
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e))
        .unwrap_or_default();
    format!("{}-{}{}", now_millis(), &new_id()[..8], ext)
}

/// Content type for a stored picture, by extension.
pub fn content_type_for(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

impl WordMapService {
    /// Store an uploaded picture and point the caller's profile at it.
    ///
    /// The previous upload, if any, is removed.
    pub fn set_profile_picture(
        &self,
        caller_id: &str,
        original_name: Option<&str>,
        data: &[u8],
    ) -> Result<UserView, WordMapError> {
        if data.is_empty() {
            return Err(WordMapError::Validation("No file uploaded".into()));
        }

        let name = self.store_picture(original_name, data)?;
        let url = format!("{}{}", UPLOAD_URL_PREFIX, name);

        let updated = self.update_user(caller_id, |user| {
            Ok(std::mem::replace(&mut user.profile_picture, url.clone()))
        });

        let (user, previous) = match updated {
            Ok(Some(done)) => done,
            Ok(None) => {
                self.discard_picture(&name);
                return Err(WordMapError::NotFound("User not found".into()));
            }
            Err(e) => {
                self.discard_picture(&name);
                return Err(e);
            }
        };

        if let Some(old) = previous.strip_prefix(UPLOAD_URL_PREFIX) {
            if old != name {
                if let Err(e) = self.blob.delete(old) {
                    tracing::warn!(user_id = %caller_id, "failed to remove old picture {}: {}", old, e);
                }
            }
        }

        tracing::info!(user_id = %caller_id, url = %url, bytes = data.len(), "profile picture updated");
        self.resolve_user(user)
    }

    /// Write `data` under a fresh name. Names are never reused, so one
    /// user's upload cannot replace another's file.
    fn store_picture(&self, original_name: Option<&str>, data: &[u8]) -> Result<String, WordMapError> {
        for _ in 0..NAME_ATTEMPTS {
            let name = picture_name(original_name);
            if self.blob.put_new(&name, data)? {
                return Ok(name);
            }
            tracing::debug!(name = %name, "picture name taken, retrying");
        }
        Err(WordMapError::Internal("no free picture name".into()))
    }

    /// Remove a picture that never made it onto a profile.
    fn discard_picture(&self, name: &str) {
        if let Err(e) = self.blob.delete(name) {
            tracing::warn!(name = %name, "failed to remove orphaned picture: {}", e);
        }
    }

    /// Read an uploaded picture by stored file name.
    pub fn read_upload(&self, name: &str) -> Result<Option<Vec<u8>>, WordMapError> {
        Ok(self.blob.get(name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CreateUser;
    use crate::service::testing::test_service;

    #[test]
    fn test_picture_name() {
        assert!(picture_name(Some("me.png")).ends_with(".png"));
        assert!(picture_name(Some("archive.tar.gz")).ends_with(".gz"));
        let bare = picture_name(Some("noext"));
        assert!(bare.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
        assert!(!bare.contains('.'));
        let odd = picture_name(Some("evil.p/ng"));
        assert!(!odd.contains('/'));
        assert!(!picture_name(None).contains('.'));
        assert_ne!(picture_name(Some("a.png")), picture_name(Some("a.png")));
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type_for("1.PNG"), "image/png");
        assert_eq!(content_type_for("1.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("1"), "application/octet-stream");
    }

    #[test]
    fn test_set_profile_picture() {
        let (svc, dir) = test_service();
        let bob = svc
            .create_user(CreateUser {
                name: "Bob".into(),
                access_code: "b0b".into(),
            })
            .unwrap();

        let view = svc.set_profile_picture(&bob.id, Some("me.png"), b"one").unwrap();
        assert!(view.profile_picture.starts_with("/uploads/"));
        assert!(view.profile_picture.ends_with(".png"));

        let first = view.profile_picture.trim_start_matches(UPLOAD_URL_PREFIX).to_string();
        assert_eq!(svc.read_upload(&first).unwrap().unwrap(), b"one");
        assert_eq!(svc.get_user(&bob.id).unwrap().profile_picture, view.profile_picture);

        let view = svc.set_profile_picture(&bob.id, Some("me.jpg"), b"two").unwrap();
        let second = view.profile_picture.trim_start_matches(UPLOAD_URL_PREFIX);
        assert_eq!(svc.read_upload(second).unwrap().unwrap(), b"two");
        assert!(!dir.path().join("uploads").join(&first).exists());
    }

    #[test]
    fn test_set_profile_picture_errors() {
        let (svc, dir) = test_service();
        assert!(matches!(
            svc.set_profile_picture("gone", Some("x.png"), b""),
            Err(WordMapError::Validation(_))
        ));
        assert!(matches!(
            svc.set_profile_picture("gone", Some("x.png"), b"data"),
            Err(WordMapError::NotFound(_))
        ));
        // No orphan file is left behind.
        let leftover = std::fs::read_dir(dir.path().join("uploads")).unwrap().count();
        assert_eq!(leftover, 0);
    }

    #[test]
    fn test_simultaneous_uploads_keep_separate_files() {
        let (svc, _dir) = test_service();
        let ann = svc
            .create_user(CreateUser {
                name: "Ann".into(),
                access_code: "ann".into(),
            })
            .unwrap();
        let ben = svc
            .create_user(CreateUser {
                name: "Ben".into(),
                access_code: "ben".into(),
            })
            .unwrap();

        let barrier = std::sync::Barrier::new(2);
        let (ann_url, ben_url) = std::thread::scope(|s| {
            let a = s.spawn(|| {
                barrier.wait();
                svc.set_profile_picture(&ann.id, Some("a.png"), b"AAAA")
                    .unwrap()
                    .profile_picture
            });
            let b = s.spawn(|| {
                barrier.wait();
                svc.set_profile_picture(&ben.id, Some("b.png"), b"BBBB")
                    .unwrap()
                    .profile_picture
            });
            (a.join().unwrap(), b.join().unwrap())
        });

        assert_ne!(ann_url, ben_url);
        let read = |url: &str| {
            svc.read_upload(url.trim_start_matches(UPLOAD_URL_PREFIX))
                .unwrap()
                .unwrap()
        };
        assert_eq!(read(&ann_url), b"AAAA");
        assert_eq!(read(&ben_url), b"BBBB");

        // Replacing Ann's picture leaves Ben's file alone.
        svc.set_profile_picture(&ann.id, Some("a2.png"), b"A2").unwrap();
        assert_eq!(read(&ben_url), b"BBBB");
    }
}
