//! Default roles installed on first bootstrap.

use crate::entities::Permission;
use crate::enums::{Action, FieldScope, Module};

/// A role as seeded, before it has an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultRole {
    pub name: &'static str,
    pub description: &'static str,
    pub permissions: Vec<Permission>,
}

fn grant(module: Module, action: Action) -> Permission {
    Permission::new(module, action)
}

fn scoped(module: Module, action: Action, scope: FieldScope) -> Permission {
    Permission::new(module, action).scope(scope)
}

/// The six built-in roles. Seeding is by name, so re-running it never
/// duplicates a role.
#[must_use]
pub fn default_roles() -> Vec<DefaultRole> {
    use Action::{Approve, Create, Delete, Read, Update};
    use FieldScope::{All, NonSeoOnly, SeoOnly};
    use Module::{ContentEntry, Media, Seo};

    vec![
        DefaultRole {
            name: "editor",
            description: "Can create/edit content, upload media, and view SEO",
            permissions: vec![
                scoped(ContentEntry, Create, All),
                scoped(ContentEntry, Read, All),
                scoped(ContentEntry, Update, All),
                grant(Media, Create),
                grant(Media, Read),
                grant(Media, Update),
                scoped(Seo, Read, All),
            ],
        },
        DefaultRole {
            name: "manager",
            description: "Can approve content",
            permissions: vec![
                grant(ContentEntry, Approve),
                scoped(ContentEntry, Read, All),
                grant(Media, Read),
                scoped(Seo, Read, All),
            ],
        },
        DefaultRole {
            name: "viewer",
            description: "Can view content only",
            permissions: vec![
                scoped(ContentEntry, Read, All),
                grant(Media, Read),
                scoped(Seo, Read, All),
            ],
        },
        DefaultRole {
            name: "admin",
            description: "Full access to all resources",
            permissions: vec![
                scoped(ContentEntry, Create, All),
                scoped(ContentEntry, Read, All),
                scoped(ContentEntry, Update, All),
                grant(ContentEntry, Delete),
                grant(ContentEntry, Approve),
                grant(Media, Create),
                grant(Media, Read),
                grant(Media, Update),
                grant(Media, Delete),
                scoped(Seo, Create, All),
                scoped(Seo, Read, All),
                scoped(Seo, Update, All),
                grant(Seo, Delete),
            ],
        },
        DefaultRole {
            name: "seo_specialist",
            description: "Can edit SEO fields only",
            permissions: vec![
                scoped(ContentEntry, Read, All),
                scoped(ContentEntry, Update, SeoOnly),
                grant(Media, Read),
                scoped(Seo, Create, All),
                scoped(Seo, Read, All),
                scoped(Seo, Update, All),
            ],
        },
        DefaultRole {
            name: "content_writer",
            description: "Can create/edit content (non-SEO fields)",
            permissions: vec![
                scoped(ContentEntry, Create, NonSeoOnly),
                scoped(ContentEntry, Read, All),
                scoped(ContentEntry, Update, NonSeoOnly),
                grant(Media, Create),
                grant(Media, Read),
            ],
        },
    ]
}
