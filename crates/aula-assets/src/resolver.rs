//! Stored reference → retrievable URL.
//!
//! Persisted references come in three shapes: a bare filename (`123.png`), a
//! folder-qualified path (`logos/123.png`) and an absolute URL (CDN uploads,
//! `data:` and `blob:` previews). All of them resolve to the same kind of
//! value, an absolute URL, or to `None` when nothing displayable exists.

use aula_core::urls::{is_absolute_url, without_query, without_scheme};
use aula_core::AssetPurpose;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceResolver {
    /// Public root URL of the local store, without trailing slash
    local_root: String,
    /// Path component of `local_root` (e.g. `uploads`), possibly empty
    root_path: String,
}

impl ReferenceResolver {
    pub fn new(local_root: impl Into<String>) -> Self {
        let local_root = local_root.into().trim_end_matches('/').to_string();
        let root_path = without_scheme(&local_root)
            .split_once('/')
            .map(|(_, path)| path.trim_matches('/').to_string())
            .unwrap_or_default();

        Self {
            local_root,
            root_path,
        }
    }

    pub fn local_root(&self) -> &str {
        &self.local_root
    }

    /// Resolve a persisted reference for display.
    ///
    /// Absolute URLs are returned unchanged, so resolving is idempotent.
    /// Relative references are placed under the local root: a reference that
    /// already carries a folder segment is used as-is, a bare filename gets
    /// the purpose's folder. Blank and malformed references yield `None`.
    pub fn resolve(&self, reference: Option<&str>, purpose: AssetPurpose) -> Option<String> {
        let reference = reference?.trim();
        if reference.is_empty() {
            return None;
        }

        if is_absolute_url(reference) {
            return Some(reference.to_string());
        }

        let relative = self.relative_path(reference)?;
        Some(format!("{}/{}", self.local_root, self.qualify(relative, purpose)))
    }

    /// Relative reference without leading slashes or a repeated root path,
    /// `None` when it is malformed.
    fn relative_path<'a>(&self, reference: &'a str) -> Option<&'a str> {
        let mut relative = reference.trim_start_matches('/');

        // "/uploads/avatars/a.png" when the root already ends in "/uploads"
        if !self.root_path.is_empty() {
            if let Some(rest) = relative
                .strip_prefix(self.root_path.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
            {
                relative = rest;
            }
        }

        let path = without_query(relative);
        if path.is_empty()
            || path.contains('\\')
            || path.chars().any(char::is_control)
            || path.split('/').any(|segment| segment.is_empty() || segment == "..")
        {
            tracing::debug!(reference = %reference, "Malformed asset reference");
            return None;
        }

        Some(relative)
    }

    fn qualify(&self, relative: &str, purpose: AssetPurpose) -> String {
        let path = without_query(relative);
        match path.split_once('/') {
            None => format!("{}/{}", purpose.folder(), relative),
            Some((folder, _)) => {
                if !folder.eq_ignore_ascii_case(purpose.folder()) {
                    tracing::debug!(
                        reference = %relative,
                        purpose = %purpose,
                        folder = %folder,
                        "Reference folder differs from requested purpose, using it as stored"
                    );
                }
                relative.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "http://localhost:3000/uploads";

    fn resolver() -> ReferenceResolver {
        ReferenceResolver::new(ROOT)
    }

    #[test]
    fn none_and_blank_resolve_to_none() {
        let resolver = resolver();
        for purpose in AssetPurpose::ALL {
            assert_eq!(resolver.resolve(None, purpose), None);
            assert_eq!(resolver.resolve(Some(""), purpose), None);
            assert_eq!(resolver.resolve(Some("   "), purpose), None);
        }
    }

    #[test]
    fn absolute_urls_are_returned_unchanged() {
        let resolver = resolver();
        let urls = [
            "https://cdn.example.edu/aula/6f1c.png",
            "http://localhost:3000/uploads/avatars/a.png",
            "data:image/png;base64,iVBORw0KGgo=",
            "blob:http://localhost:3000/0b5e-11",
            "//cdn.example.edu/aula/6f1c.png",
            "https://cdn.example.edu/aula/foto%20de%20perfil.png?v=3",
        ];
        for url in urls {
            for purpose in AssetPurpose::ALL {
                let resolved = resolver.resolve(Some(url), purpose);
                assert_eq!(resolved.as_deref(), Some(url));
                // Idempotent
                assert_eq!(resolver.resolve(resolved.as_deref(), purpose), resolved);
            }
        }
    }

    #[test]
    fn bare_filename_gets_purpose_folder() {
        let resolver = resolver();
        assert_eq!(
            resolver.resolve(Some("abc.png"), AssetPurpose::Avatars).unwrap(),
            "http://localhost:3000/uploads/avatars/abc.png"
        );
        assert_eq!(
            resolver.resolve(Some("acta.pdf"), AssetPurpose::Documents).unwrap(),
            "http://localhost:3000/uploads/documents/acta.pdf"
        );
        assert_eq!(
            resolver.resolve(Some("123.jpg"), AssetPurpose::Profile).unwrap(),
            "http://localhost:3000/uploads/profile/123.jpg"
        );
    }

    #[test]
    fn bare_and_qualified_forms_resolve_identically() {
        let resolver = resolver();
        for purpose in AssetPurpose::ALL {
            let bare = resolver.resolve(Some("abc.png"), purpose);
            let qualified =
                resolver.resolve(Some(&format!("{}/abc.png", purpose.folder())), purpose);
            let rooted = resolver.resolve(Some(&format!("/{}/abc.png", purpose.folder())), purpose);
            let with_root_path =
                resolver.resolve(Some(&format!("/uploads/{}/abc.png", purpose.folder())), purpose);
            assert!(bare.is_some());
            assert_eq!(bare, qualified);
            assert_eq!(bare, rooted);
            assert_eq!(bare, with_root_path);
        }
    }

    #[test]
    fn folder_segment_appears_once() {
        let resolver = resolver();
        let url = resolver
            .resolve(Some("logos/escudo.png"), AssetPurpose::Logos)
            .unwrap();
        assert_eq!(url, "http://localhost:3000/uploads/logos/escudo.png");
        assert_eq!(url.matches("logos").count(), 1);
    }

    #[test]
    fn mismatched_folder_is_used_as_stored() {
        let resolver = resolver();
        // A logo reference resolved while rendering a background
        assert_eq!(
            resolver
                .resolve(Some("logos/escudo.png"), AssetPurpose::Backgrounds)
                .unwrap(),
            "http://localhost:3000/uploads/logos/escudo.png"
        );
        // and the other way around
        assert_eq!(
            resolver
                .resolve(Some("backgrounds/patio.jpg"), AssetPurpose::Logos)
                .unwrap(),
            "http://localhost:3000/uploads/backgrounds/patio.jpg"
        );
        // Unknown folders are not double prefixed either
        assert_eq!(
            resolver
                .resolve(Some("legacy/foto.png"), AssetPurpose::Profile)
                .unwrap(),
            "http://localhost:3000/uploads/legacy/foto.png"
        );
    }

    #[test]
    fn malformed_references_resolve_to_none() {
        let resolver = resolver();
        for reference in [
            "../secret.png",
            "avatars/../../etc/passwd",
            "avatars\\a.png",
            "avatars//a.png",
            "avatars/",
            "/",
            "a\u{0000}.png",
            "a\n.png",
        ] {
            assert_eq!(
                resolver.resolve(Some(reference), AssetPurpose::Avatars),
                None,
                "{:?}",
                reference
            );
        }
    }

    #[test]
    fn percent_encoding_and_query_are_preserved() {
        let resolver = resolver();
        assert_eq!(
            resolver
                .resolve(Some("foto%20nueva.png?v=2"), AssetPurpose::Profile)
                .unwrap(),
            "http://localhost:3000/uploads/profile/foto%20nueva.png?v=2"
        );
    }

    #[test]
    fn root_without_path_and_trailing_slash() {
        let resolver = ReferenceResolver::new("https://files.example.edu/");
        assert_eq!(resolver.local_root(), "https://files.example.edu");
        assert_eq!(
            resolver.resolve(Some("a.pdf"), AssetPurpose::Documents).unwrap(),
            "https://files.example.edu/documents/a.pdf"
        );
        // No root path to strip
        assert_eq!(
            resolver
                .resolve(Some("uploads/a.pdf"), AssetPurpose::Documents)
                .unwrap(),
            "https://files.example.edu/uploads/a.pdf"
        );
    }

    #[test]
    fn word_prefixed_filenames_are_bare_references() {
        let resolver = resolver();
        assert_eq!(
            resolver.resolve(Some("foto:1.png"), AssetPurpose::Profile).unwrap(),
            "http://localhost:3000/uploads/profile/foto:1.png"
        );
        assert_eq!(
            resolver.resolve(Some("logos/foto:1.png"), AssetPurpose::Logos).unwrap(),
            "http://localhost:3000/uploads/logos/foto:1.png"
        );
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn purpose() -> impl Strategy<Value = AssetPurpose> {
            prop::sample::select(AssetPurpose::ALL.to_vec())
        }

        fn absolute_url() -> impl Strategy<Value = String> {
            (
                prop::sample::select(vec!["https://", "http://", "//", "HTTPS://"]),
                "[a-z0-9-]{1,12}(\\.[a-z]{2,6}){1,2}",
                "(/[A-Za-z0-9._%-]{1,12}){0,4}",
                prop::option::of("\\?[a-z]=[0-9]{1,4}"),
            )
                .prop_map(|(scheme, host, path, query)| {
                    format!("{}{}{}{}", scheme, host, path, query.unwrap_or_default())
                })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(256))]

            #[test]
            fn absolute_urls_resolve_to_themselves(url in absolute_url(), purpose in purpose()) {
                let resolver = resolver();
                prop_assert_eq!(resolver.resolve(Some(&url), purpose), Some(url.clone()));
            }

            #[test]
            fn resolving_is_idempotent(reference in any::<String>(), purpose in purpose()) {
                let resolver = resolver();
                if let Some(url) = resolver.resolve(Some(&reference), purpose) {
                    prop_assert_eq!(resolver.resolve(Some(&url), purpose), Some(url.clone()));
                    prop_assert!(is_absolute_url(&url));
                }
            }

            #[test]
            fn bare_filenames_get_the_purpose_folder(
                name in "[A-Za-z0-9_-]{1,16}\\.(png|jpg|pdf)",
                purpose in purpose(),
            ) {
                let resolver = resolver();
                let expected = format!("{}/{}/{}", ROOT, purpose.folder(), name);
                prop_assert_eq!(resolver.resolve(Some(&name), purpose), Some(expected));
            }
        }
    }
}
