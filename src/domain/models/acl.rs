/// Canned access-control lists accepted by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CannedAcl {
    Private,
    PublicRead,
    PublicReadWrite,
    AuthenticatedRead,
}

impl CannedAcl {
    pub fn as_str(&self) -> &'static str {
        match self {
            CannedAcl::Private => "private",
            CannedAcl::PublicRead => "public-read",
            CannedAcl::PublicReadWrite => "public-read-write",
            CannedAcl::AuthenticatedRead => "authenticated-read",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "private" => Some(CannedAcl::Private),
            "public-read" => Some(CannedAcl::PublicRead),
            "public-read-write" => Some(CannedAcl::PublicReadWrite),
            "authenticated-read" => Some(CannedAcl::AuthenticatedRead),
            _ => None,
        }
    }
}

impl std::fmt::Display for CannedAcl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CannedAcl {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown canned ACL: {}", s))
    }
}

/// A permission granted on an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    FullControl,
    Read,
    Write,
    ReadAcp,
    WriteAcp,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::FullControl => "FULL_CONTROL",
            Permission::Read => "READ",
            Permission::Write => "WRITE",
            Permission::ReadAcp => "READ_ACP",
            Permission::WriteAcp => "WRITE_ACP",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "FULL_CONTROL" => Some(Permission::FullControl),
            "READ" => Some(Permission::Read),
            "WRITE" => Some(Permission::Write),
            "READ_ACP" => Some(Permission::ReadAcp),
            "WRITE_ACP" => Some(Permission::WriteAcp),
            _ => None,
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// URI identifying the anonymous-access group
pub const ALL_USERS_GROUP: &str = "http://acs.amazonaws.com/groups/global/AllUsers";

/// URI identifying the authenticated-users group
pub const AUTHENTICATED_USERS_GROUP: &str =
    "http://acs.amazonaws.com/groups/global/AuthenticatedUsers";

/// The party a grant applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grantee {
    CanonicalUser {
        id: String,
        display_name: Option<String>,
    },
    Group {
        uri: String,
    },
}

/// A single (grantee, permission) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub grantee: Grantee,
    pub permission: Permission,
}

/// The full access-control list of an object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessControlList {
    pub owner_id: Option<String>,
    pub grants: Vec<Grant>,
}

impl AccessControlList {
    /// Whether any grant gives READ to the anonymous-access group
    pub fn is_public_read(&self) -> bool {
        self.grants.iter().any(|grant| {
            grant.permission == Permission::Read
                && matches!(&grant.grantee, Grantee::Group { uri } if uri == ALL_USERS_GROUP)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canned_acl_round_trips_through_str() {
        for acl in [
            CannedAcl::Private,
            CannedAcl::PublicRead,
            CannedAcl::PublicReadWrite,
            CannedAcl::AuthenticatedRead,
        ] {
            assert_eq!(CannedAcl::parse(acl.as_str()), Some(acl));
        }
        assert_eq!(CannedAcl::parse("bucket-owner-read"), None);
    }

    #[test]
    fn public_read_detection() {
        let private = AccessControlList {
            owner_id: Some("owner".to_string()),
            grants: vec![Grant {
                grantee: Grantee::CanonicalUser {
                    id: "owner".to_string(),
                    display_name: None,
                },
                permission: Permission::FullControl,
            }],
        };
        assert!(!private.is_public_read());

        let mut public = private.clone();
        public.grants.push(Grant {
            grantee: Grantee::Group {
                uri: ALL_USERS_GROUP.to_string(),
            },
            permission: Permission::Read,
        });
        assert!(public.is_public_read());
    }
}
