//! Bucket access-policy documents.
//!
//! Policies are immutable value types produced by pure builder constructors.
//! Each policy change produces a brand-new document that fully replaces the
//! prior one; nothing is merged.

/// Policy language version understood by the provider.
pub const POLICY_VERSION: &str = "2012-10-17";

/// The principal a statement grants access to.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum Principal {
    /// Anyone (`"*"`).
    Anyone(&'static str),
    /// A single provider-managed canonical user.
    CanonicalUser {
        /// The canonical user ID.
        #[serde(rename = "CanonicalUser")]
        canonical_user: String,
    },
}

/// One statement of an access policy.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PolicyStatement {
    /// Statement ID.
    #[serde(rename = "Sid")]
    pub sid: String,
    /// Statement effect (always `Allow` here).
    #[serde(rename = "Effect")]
    pub effect: String,
    /// Principal the statement applies to.
    #[serde(rename = "Principal")]
    pub principal: Principal,
    /// Granted action.
    #[serde(rename = "Action")]
    pub action: String,
    /// Resource the action is granted on.
    #[serde(rename = "Resource")]
    pub resource: String,
}

/// A bucket access-policy document.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AccessPolicy {
    /// Policy language version.
    #[serde(rename = "Version")]
    pub version: &'static str,
    /// Ordered statements.
    #[serde(rename = "Statement")]
    pub statements: Vec<PolicyStatement>,
}

impl AccessPolicy {
    /// A single-statement policy granting object reads to anyone.
    #[must_use]
    pub fn public_read(bucket: &str) -> Self {
        Self {
            version: POLICY_VERSION,
            statements: vec![PolicyStatement {
                sid: "PublicReadGetObject".to_owned(),
                effect: "Allow".to_owned(),
                principal: Principal::Anyone("*"),
                action: "s3:GetObject".to_owned(),
                resource: object_arn(bucket),
            }],
        }
    }

    /// A single-statement policy granting object reads to one canonical
    /// user, used when the bucket is read through an access identity instead
    /// of being world-readable.
    #[must_use]
    pub fn identity_scoped(bucket: &str, canonical_user_id: &str) -> Self {
        Self {
            version: POLICY_VERSION,
            statements: vec![PolicyStatement {
                sid: "AllowCloudFrontOAIAccess".to_owned(),
                effect: "Allow".to_owned(),
                principal: Principal::CanonicalUser {
                    canonical_user: canonical_user_id.to_owned(),
                },
                action: "s3:GetObject".to_owned(),
                resource: object_arn(bucket),
            }],
        }
    }

    /// Render the policy as the provider's JSON document.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("policy document serializes to JSON")
    }
}

/// ARN matching every object in a bucket.
fn object_arn(bucket: &str) -> String {
    format!("arn:aws:s3:::{bucket}/*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_build_public_read_policy() {
        let policy = AccessPolicy::public_read("demo-site");
        let value: serde_json::Value =
            serde_json::from_str(&policy.to_json()).expect("valid JSON");

        assert_eq!(value["Version"], "2012-10-17");
        assert_eq!(value["Statement"][0]["Sid"], "PublicReadGetObject");
        assert_eq!(value["Statement"][0]["Effect"], "Allow");
        assert_eq!(value["Statement"][0]["Principal"], "*");
        assert_eq!(value["Statement"][0]["Action"], "s3:GetObject");
        assert_eq!(
            value["Statement"][0]["Resource"],
            "arn:aws:s3:::demo-site/*"
        );
    }

    #[test]
    fn test_should_build_identity_scoped_policy() {
        let policy = AccessPolicy::identity_scoped("demo-site", "canonical-123");
        let value: serde_json::Value =
            serde_json::from_str(&policy.to_json()).expect("valid JSON");

        assert_eq!(value["Statement"][0]["Sid"], "AllowCloudFrontOAIAccess");
        assert_eq!(
            value["Statement"][0]["Principal"]["CanonicalUser"],
            "canonical-123"
        );
    }

    #[test]
    fn test_should_be_deterministic_for_same_inputs() {
        let a = AccessPolicy::public_read("demo-site");
        let b = AccessPolicy::public_read("demo-site");
        assert_eq!(a, b);
        assert_eq!(a.to_json(), b.to_json());
    }

    #[test]
    fn test_should_have_exactly_one_statement() {
        assert_eq!(AccessPolicy::public_read("b").statements.len(), 1);
        assert_eq!(AccessPolicy::identity_scoped("b", "u").statements.len(), 1);
    }
}
