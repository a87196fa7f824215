//! Tables for the v4.7 server schema.

use super::{BlackBoxTables, MappingTable};
use crate::models::settings::{
    AddressFormat, AuthenticationType, DetectionType, DotNetProjectType, JavaVersion, Language,
    ProxyType, ScanLevel, ScanScope,
};
use crate::server::v470::{
    self, AuthType, BlackBoxFormDetection, BlackBoxFormat, BlackBoxScanLevel,
    ProgrammingLanguageGroup, V470,
};

pub static BLACK_BOX: BlackBoxTables<V470> = BlackBoxTables {
    scan_level: MappingTable::new(
        &[
            (ScanLevel::None, BlackBoxScanLevel::None),
            (ScanLevel::Fast, BlackBoxScanLevel::Fast),
            (ScanLevel::Normal, BlackBoxScanLevel::Normal),
            (ScanLevel::Full, BlackBoxScanLevel::Full),
        ],
        BlackBoxScanLevel::None,
    ),
    scan_scope: MappingTable::new(
        &[
            (ScanScope::Domain, v470::ScanScope::Domain),
            (ScanScope::Folder, v470::ScanScope::Folder),
            (ScanScope::Path, v470::ScanScope::Path),
        ],
        v470::ScanScope::Domain,
    ),
    auth_type: MappingTable::new(
        &[
            (AuthenticationType::None, AuthType::None),
            (AuthenticationType::Form, AuthType::Form),
            (AuthenticationType::Http, AuthType::Http),
            (AuthenticationType::Cookie, AuthType::RawCookie),
        ],
        AuthType::None,
    ),
    proxy_type: MappingTable::new(
        &[
            (ProxyType::Http, v470::ProxyType::Http),
            (ProxyType::HttpNoConnect, v470::ProxyType::HttpNoConnect),
            (ProxyType::Socks4, v470::ProxyType::Socks4),
            (ProxyType::Socks5, v470::ProxyType::Socks5),
        ],
        v470::ProxyType::Http,
    ),
    form_detection: MappingTable::new(
        &[
            (DetectionType::Auto, BlackBoxFormDetection::Auto),
            (DetectionType::Manual, BlackBoxFormDetection::Manual),
        ],
        BlackBoxFormDetection::Auto,
    ),
    address_format: MappingTable::new(
        &[
            (AddressFormat::Wildcard, BlackBoxFormat::Wildcard),
            (AddressFormat::ExactMatch, BlackBoxFormat::ExactMatch),
            (AddressFormat::Regexp, BlackBoxFormat::Regexp),
        ],
        BlackBoxFormat::Wildcard,
    ),
};

pub static LANGUAGE_GROUP: MappingTable<Language, ProgrammingLanguageGroup> = MappingTable::new(
    &[
        (Language::Cpp, ProgrammingLanguageGroup::CAndCPlusPlus),
        (Language::Go, ProgrammingLanguageGroup::Go),
        (Language::JavaScript, ProgrammingLanguageGroup::JavaScript),
        (Language::CSharpWinOnly, ProgrammingLanguageGroup::CSharpWinOnly),
        (Language::CSharp, ProgrammingLanguageGroup::CSharp),
        (Language::Java, ProgrammingLanguageGroup::Java),
        (Language::Kotlin, ProgrammingLanguageGroup::Kotlin),
        (Language::Sql, ProgrammingLanguageGroup::Sql),
        (Language::Python, ProgrammingLanguageGroup::Python),
        (Language::Swift, ProgrammingLanguageGroup::Swift),
        (Language::Vb, ProgrammingLanguageGroup::Vb),
        (Language::Php, ProgrammingLanguageGroup::Php),
        (Language::ObjectiveC, ProgrammingLanguageGroup::ObjectiveC),
        (Language::Ruby, ProgrammingLanguageGroup::Ruby),
    ],
    ProgrammingLanguageGroup::None,
);

pub static JAVA_VERSION: MappingTable<JavaVersion, v470::JavaVersions> = MappingTable::new(
    &[
        (JavaVersion::V1_8, v470::JavaVersions::V8),
        (JavaVersion::V1_11, v470::JavaVersions::V11),
        (JavaVersion::V1_17, v470::JavaVersions::V17),
    ],
    v470::JavaVersions::V11,
);

pub static DOTNET_PROJECT_TYPE: MappingTable<DotNetProjectType, v470::DotNetProjectType> =
    MappingTable::new(
        &[
            (DotNetProjectType::None, v470::DotNetProjectType::None),
            (DotNetProjectType::Solution, v470::DotNetProjectType::Solution),
            (DotNetProjectType::Website, v470::DotNetProjectType::WebSite),
        ],
        v470::DotNetProjectType::None,
    );

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_box_tables_are_total_over_targets() {
        for level in BlackBoxScanLevel::ALL {
            assert!(BLACK_BOX.scan_level.covers(level), "{level:?}");
        }
        for scope in v470::ScanScope::ALL {
            assert!(BLACK_BOX.scan_scope.covers(scope), "{scope:?}");
        }
        for auth in AuthType::ALL {
            assert!(BLACK_BOX.auth_type.covers(auth), "{auth:?}");
        }
        for proxy in v470::ProxyType::ALL {
            assert!(BLACK_BOX.proxy_type.covers(proxy), "{proxy:?}");
        }
        for detection in BlackBoxFormDetection::ALL {
            assert!(BLACK_BOX.form_detection.covers(detection), "{detection:?}");
        }
        for format in BlackBoxFormat::ALL {
            assert!(BLACK_BOX.address_format.covers(format), "{format:?}");
        }
    }

    #[test]
    fn technology_tables_are_total_over_targets() {
        for group in ProgrammingLanguageGroup::ALL {
            assert!(LANGUAGE_GROUP.covers(group), "{group:?}");
        }
        for version in v470::JavaVersions::ALL {
            assert!(JAVA_VERSION.covers(version), "{version:?}");
        }
        for project_type in v470::DotNetProjectType::ALL {
            assert!(DOTNET_PROJECT_TYPE.covers(project_type), "{project_type:?}");
        }
    }

    #[test]
    fn every_internal_value_has_an_entry() {
        for language in Language::ALL {
            assert!(LANGUAGE_GROUP.get(language).is_some(), "{language:?}");
        }
        for auth in AuthenticationType::ALL {
            assert!(BLACK_BOX.auth_type.get(auth).is_some(), "{auth:?}");
        }
        for proxy in ProxyType::ALL {
            assert!(BLACK_BOX.proxy_type.get(proxy).is_some(), "{proxy:?}");
        }
    }

    #[test]
    fn cookie_maps_to_raw_cookie() {
        assert_eq!(BLACK_BOX.auth_type.map(AuthenticationType::Cookie), AuthType::RawCookie);
    }
}
