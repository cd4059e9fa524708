use std::collections::HashMap;
use std::sync::OnceLock;

use javelin_model::{Mutability, Nullability};
use serde::Serialize;

/// Qualifiers forced onto one type position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TypeEnhancementInfo {
    pub nullability: Option<Nullability>,
    pub mutability: Option<Mutability>,
}

impl TypeEnhancementInfo {
    const fn nullability(nullability: Nullability) -> Self {
        Self {
            nullability: Some(nullability),
            mutability: None,
        }
    }
}

/// Corrections for a well-known library method whose annotations are missing or wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredefinedEnhancementInfo {
    pub return_info: Option<TypeEnhancementInfo>,
    /// One entry per JVM parameter, in order.
    pub parameters: Vec<Option<TypeEnhancementInfo>>,
}

/// Look up the correction for an owner-qualified JVM signature (see
/// [`crate::SignatureDescriptorBuilder::signature`]).
pub fn predefined_enhancement(signature: &str) -> Option<&'static PredefinedEnhancementInfo> {
    table().get(signature)
}

/// Every signature with a predefined correction, sorted.
pub fn predefined_signatures() -> Vec<&'static str> {
    let mut signatures: Vec<_> = table().keys().map(String::as_str).collect();
    signatures.sort_unstable();
    signatures
}

fn table() -> &'static HashMap<String, PredefinedEnhancementInfo> {
    static TABLE: OnceLock<HashMap<String, PredefinedEnhancementInfo>> = OnceLock::new();
    TABLE.get_or_init(build_table)
}

type Info = Option<TypeEnhancementInfo>;

const PLATFORM: Info = None;
const NOT_NULL: Info = Some(TypeEnhancementInfo::nullability(Nullability::NotNull));
const NULLABLE: Info = Some(TypeEnhancementInfo::nullability(Nullability::Nullable));

const OBJECT: &str = "Ljava/lang/Object;";
const BOOLEAN: &str = "Z";
const VOID: &str = "V";

const CONSUMER: &str = "Ljava/util/function/Consumer;";
const BI_CONSUMER: &str = "Ljava/util/function/BiConsumer;";
const PREDICATE: &str = "Ljava/util/function/Predicate;";
const FUNCTION: &str = "Ljava/util/function/Function;";
const BI_FUNCTION: &str = "Ljava/util/function/BiFunction;";
const UNARY_OPERATOR: &str = "Ljava/util/function/UnaryOperator;";

struct TableBuilder {
    table: HashMap<String, PredefinedEnhancementInfo>,
}

impl TableBuilder {
    fn class(&mut self, internal_name: &'static str) -> ClassEnhancements<'_> {
        ClassEnhancements {
            table: &mut self.table,
            internal_name,
        }
    }
}

struct ClassEnhancements<'t> {
    table: &'t mut HashMap<String, PredefinedEnhancementInfo>,
    internal_name: &'static str,
}

impl ClassEnhancements<'_> {
    fn function(&mut self, name: &str, params: &[(&str, Info)], returns: (&str, Info)) -> &mut Self {
        let mut signature = format!("{}.{name}(", self.internal_name);
        for (descriptor, _) in params {
            signature.push_str(descriptor);
        }
        signature.push(')');
        signature.push_str(returns.0);

        self.table.insert(
            signature,
            PredefinedEnhancementInfo {
                return_info: returns.1,
                parameters: params.iter().map(|(_, info)| *info).collect(),
            },
        );
        self
    }
}

fn build_table() -> HashMap<String, PredefinedEnhancementInfo> {
    let mut builder = TableBuilder {
        table: HashMap::new(),
    };

    builder
        .class("java/lang/Iterable")
        .function("forEach", &[(CONSUMER, NOT_NULL)], (VOID, PLATFORM))
        .function("spliterator", &[], ("Ljava/util/Spliterator;", NOT_NULL));

    builder
        .class("java/util/Iterator")
        .function("forEachRemaining", &[(CONSUMER, NOT_NULL)], (VOID, PLATFORM));

    builder
        .class("java/util/Collection")
        .function("removeIf", &[(PREDICATE, NOT_NULL)], (BOOLEAN, PLATFORM))
        .function("stream", &[], ("Ljava/util/stream/Stream;", NOT_NULL))
        .function("parallelStream", &[], ("Ljava/util/stream/Stream;", NOT_NULL));

    builder
        .class("java/util/List")
        .function("replaceAll", &[(UNARY_OPERATOR, NOT_NULL)], (VOID, PLATFORM));

    builder
        .class("java/util/Map")
        .function("forEach", &[(BI_CONSUMER, NOT_NULL)], (VOID, PLATFORM))
        .function(
            "putIfAbsent",
            &[(OBJECT, NOT_NULL), (OBJECT, NOT_NULL)],
            (OBJECT, NULLABLE),
        )
        .function(
            "replace",
            &[(OBJECT, NOT_NULL), (OBJECT, NOT_NULL)],
            (OBJECT, NULLABLE),
        )
        .function(
            "replace",
            &[(OBJECT, NOT_NULL), (OBJECT, NOT_NULL), (OBJECT, NOT_NULL)],
            (BOOLEAN, PLATFORM),
        )
        .function("replaceAll", &[(BI_FUNCTION, NOT_NULL)], (VOID, PLATFORM))
        .function(
            "compute",
            &[(OBJECT, NOT_NULL), (BI_FUNCTION, NOT_NULL)],
            (OBJECT, NULLABLE),
        )
        .function(
            "computeIfAbsent",
            &[(OBJECT, NOT_NULL), (FUNCTION, NOT_NULL)],
            (OBJECT, NOT_NULL),
        )
        .function(
            "computeIfPresent",
            &[(OBJECT, NOT_NULL), (BI_FUNCTION, NOT_NULL)],
            (OBJECT, NULLABLE),
        )
        .function(
            "merge",
            &[(OBJECT, NOT_NULL), (OBJECT, NOT_NULL), (BI_FUNCTION, NOT_NULL)],
            (OBJECT, NULLABLE),
        );

    builder
        .class("java/util/Optional")
        .function("empty", &[], ("Ljava/util/Optional;", NOT_NULL))
        .function("of", &[(OBJECT, NOT_NULL)], ("Ljava/util/Optional;", NOT_NULL))
        .function("ofNullable", &[(OBJECT, NULLABLE)], ("Ljava/util/Optional;", NOT_NULL))
        .function("get", &[], (OBJECT, NOT_NULL))
        .function("ifPresent", &[(CONSUMER, NOT_NULL)], (VOID, PLATFORM));

    builder
        .class("java/lang/ref/Reference")
        .function("get", &[], (OBJECT, NULLABLE));

    builder
        .class("java/util/function/Predicate")
        .function("test", &[(OBJECT, NOT_NULL)], (BOOLEAN, PLATFORM));
    builder
        .class("java/util/function/BiPredicate")
        .function("test", &[(OBJECT, NOT_NULL), (OBJECT, NOT_NULL)], (BOOLEAN, PLATFORM));
    builder
        .class("java/util/function/Consumer")
        .function("accept", &[(OBJECT, NOT_NULL)], (VOID, PLATFORM));
    builder
        .class("java/util/function/BiConsumer")
        .function("accept", &[(OBJECT, NOT_NULL), (OBJECT, NOT_NULL)], (VOID, PLATFORM));
    builder
        .class("java/util/function/Function")
        .function("apply", &[(OBJECT, NOT_NULL)], (OBJECT, NOT_NULL));
    builder
        .class("java/util/function/BiFunction")
        .function("apply", &[(OBJECT, NOT_NULL), (OBJECT, NOT_NULL)], (OBJECT, NOT_NULL));
    builder
        .class("java/util/function/Supplier")
        .function("get", &[], (OBJECT, NOT_NULL));

    builder.table
}
