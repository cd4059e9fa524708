use javelin_model::{
    erase, internal_name, DeclarationStore, JavaType, RawMember, RawMemberKind, TypeParamScope,
};

/// Builds JVM-style descriptors for foreign members.
///
/// Descriptors only serve as lookup keys into the predefined enhancement table, so they are a
/// pure function of the member's name and erased signature: two structurally equal members always
/// describe the same way, whichever ids they carry.
#[derive(Debug, Clone, Copy)]
pub struct SignatureDescriptorBuilder<'a> {
    store: &'a DeclarationStore,
}

impl<'a> SignatureDescriptorBuilder<'a> {
    pub fn new(store: &'a DeclarationStore) -> Self {
        Self { store }
    }

    /// `name(params)return` for methods, `name:type` for fields.
    ///
    /// An extension receiver is described as the leading parameter, as the JVM sees it.
    pub fn describe(&self, member: &RawMember) -> String {
        let class_params = self
            .store
            .class(member.owner)
            .map(|class| class.type_params.as_slice())
            .unwrap_or_default();

        let mut out = String::from(member.name.as_str());
        match &member.kind {
            RawMemberKind::Field(field) => {
                let scope = TypeParamScope::new(&[], class_params);
                out.push(':');
                append_erased(&mut out, &field.ty.ty, &scope);
            }
            RawMemberKind::Method(method) => {
                let scope = TypeParamScope::new(&method.type_params, class_params);
                out.push('(');
                for ty in method
                    .receiver
                    .iter()
                    .chain(method.params.iter().map(|param| &param.ty))
                {
                    append_erased(&mut out, &ty.ty, &scope);
                }
                out.push(')');
                append_erased(&mut out, &method.return_type.ty, &scope);
            }
        }
        out
    }

    /// Owner-qualified descriptor, e.g.
    /// `java/util/Map.putIfAbsent(Ljava/lang/Object;Ljava/lang/Object;)Ljava/lang/Object;`.
    pub fn signature(&self, owner: &str, member: &RawMember) -> String {
        format!("{}.{}", internal_name(owner), self.describe(member))
    }
}

fn append_erased(out: &mut String, ty: &JavaType, scope: &TypeParamScope<'_>) {
    append_descriptor(out, &erase(ty, scope));
}

fn append_descriptor(out: &mut String, erased: &JavaType) {
    match erased {
        JavaType::Primitive(primitive) => out.push(primitive.descriptor_char()),
        JavaType::Void => out.push('V'),
        JavaType::Class(class) => {
            out.push('L');
            out.push_str(&internal_name(class.name.as_str()));
            out.push(';');
        }
        JavaType::Array(component) => {
            out.push('[');
            append_descriptor(out, component);
        }
        // Erasure never leaves a type variable behind.
        JavaType::TypeVar(_) => out.push_str("Ljava/lang/Object;"),
    }
}
