use javelin_config::EnhancementConfig;
use javelin_enhance::{ClassUseSiteScope, EnhancementScope};
use javelin_model::{Annotation, ClassId, DeclarationStore, JavaType, TypeRef, ValueParameter};

pub const NOT_NULL: &str = "org.jetbrains.annotations.NotNull";
pub const NULLABLE: &str = "org.jetbrains.annotations.Nullable";

pub fn string() -> JavaType {
    JavaType::named("java.lang.String")
}

pub fn annotated_string(annotation: &str) -> TypeRef {
    TypeRef::new(string()).annotated(Annotation::new(annotation))
}

pub fn string_param(name: &str) -> ValueParameter {
    ValueParameter::new(string()).named(name)
}

pub fn scope<'a>(
    store: &'a DeclarationStore,
    class: ClassId,
    config: &EnhancementConfig,
) -> EnhancementScope<'a, ClassUseSiteScope<'a>> {
    EnhancementScope::new(store, ClassUseSiteScope::new(store, class), config)
}
