use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_codes {
    pub const TYPE_MISMATCH: u32 = 1001;
    pub const TYPE_INFERENCE_POSTPONED_VARIABLE_IN_RECEIVER_TYPE: u32 = 1002;
    pub const MISSING_DEPENDENCY_SUPERCLASS: u32 = 1003;
    pub const UNRESOLVED_REFERENCE: u32 = 1004;
    pub const CALLABLE_REFERENCE_TO_ABSTRACT_CLASS_CONSTRUCTOR: u32 = 1005;
    pub const CALLABLE_REFERENCE_TO_ANNOTATION_CONSTRUCTOR: u32 = 1006;
    pub const NO_VALUE_FOR_PARAMETER: u32 = 1007;
    pub const DEPRECATION: u32 = 1008;
}

pub mod diagnostic_messages {
    pub const TYPE_MISMATCH: &str = "Type mismatch: inferred type is {0} but {1} was expected";
    pub const TYPE_INFERENCE_POSTPONED_VARIABLE_IN_RECEIVER_TYPE: &str =
        "Postponed type variable in receiver type is not allowed: {0}";
    pub const MISSING_DEPENDENCY_SUPERCLASS: &str =
        "Cannot access class '{0}'. Check your module classpath for missing or conflicting dependencies";
    pub const UNRESOLVED_REFERENCE: &str = "Unresolved reference: {0}";
    pub const CALLABLE_REFERENCE_TO_ABSTRACT_CLASS_CONSTRUCTOR: &str =
        "Cannot create an instance of an abstract class '{0}'";
    pub const CALLABLE_REFERENCE_TO_ANNOTATION_CONSTRUCTOR: &str =
        "Annotation class '{0}' cannot be instantiated by reference";
    pub const NO_VALUE_FOR_PARAMETER: &str = "No value passed for parameter '{0}'";
    pub const DEPRECATION: &str = "'{0}' is deprecated";
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::TYPE_MISMATCH,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::TYPE_MISMATCH,
    },
    DiagnosticMessage {
        code: diagnostic_codes::TYPE_INFERENCE_POSTPONED_VARIABLE_IN_RECEIVER_TYPE,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::TYPE_INFERENCE_POSTPONED_VARIABLE_IN_RECEIVER_TYPE,
    },
    DiagnosticMessage {
        code: diagnostic_codes::MISSING_DEPENDENCY_SUPERCLASS,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::MISSING_DEPENDENCY_SUPERCLASS,
    },
    DiagnosticMessage {
        code: diagnostic_codes::UNRESOLVED_REFERENCE,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::UNRESOLVED_REFERENCE,
    },
    DiagnosticMessage {
        code: diagnostic_codes::CALLABLE_REFERENCE_TO_ABSTRACT_CLASS_CONSTRUCTOR,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::CALLABLE_REFERENCE_TO_ABSTRACT_CLASS_CONSTRUCTOR,
    },
    DiagnosticMessage {
        code: diagnostic_codes::CALLABLE_REFERENCE_TO_ANNOTATION_CONSTRUCTOR,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::CALLABLE_REFERENCE_TO_ANNOTATION_CONSTRUCTOR,
    },
    DiagnosticMessage {
        code: diagnostic_codes::NO_VALUE_FOR_PARAMETER,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::NO_VALUE_FOR_PARAMETER,
    },
    DiagnosticMessage {
        code: diagnostic_codes::DEPRECATION,
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::DEPRECATION,
    },
];
