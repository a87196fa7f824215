//! Tables for the legacy v4.1.1 server schema.

use super::{BlackBoxTables, MappingTable};
use crate::models::settings::{
    AddressFormat, AuthenticationType, DetectionType, Language, ProxyType, ScanLevel, ScanScope,
};
use crate::server::v411::{
    self, AuthType, BlackBoxFormDetection, BlackBoxFormat, BlackBoxScanLevel, ProgrammingLanguage,
    V411,
};

pub static BLACK_BOX: BlackBoxTables<V411> = BlackBoxTables {
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
            (ScanScope::Domain, v411::ScanScope::Domain),
            (ScanScope::Folder, v411::ScanScope::Folder),
            (ScanScope::Path, v411::ScanScope::Path),
        ],
        v411::ScanScope::Domain,
    ),
    // No raw cookie authentication in this schema.
    auth_type: MappingTable::new(
        &[
            (AuthenticationType::None, AuthType::None),
            (AuthenticationType::Form, AuthType::Form),
            (AuthenticationType::Http, AuthType::Http),
        ],
        AuthType::None,
    ),
    proxy_type: MappingTable::new(
        &[
            (ProxyType::Http, v411::ProxyType::Http),
            (ProxyType::HttpNoConnect, v411::ProxyType::HttpNoConnect),
            (ProxyType::Socks5, v411::ProxyType::Socks5),
        ],
        v411::ProxyType::Http,
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

pub static PROGRAMMING_LANGUAGE: MappingTable<Language, ProgrammingLanguage> = MappingTable::new(
    &[
        (Language::Cpp, ProgrammingLanguage::CPlusPlus),
        (Language::Go, ProgrammingLanguage::Go),
        (Language::JavaScript, ProgrammingLanguage::JavaScript),
        (Language::CSharpWinOnly, ProgrammingLanguage::DotNet),
        (Language::CSharp, ProgrammingLanguage::DotNet),
        (Language::Vb, ProgrammingLanguage::DotNet),
        (Language::Java, ProgrammingLanguage::Java),
        (Language::Kotlin, ProgrammingLanguage::Kotlin),
        (Language::Sql, ProgrammingLanguage::Sql),
        (Language::Python, ProgrammingLanguage::Python),
        (Language::Swift, ProgrammingLanguage::Swift),
        (Language::Php, ProgrammingLanguage::Php),
        (Language::ObjectiveC, ProgrammingLanguage::ObjectiveC),
    ],
    ProgrammingLanguage::None,
);
