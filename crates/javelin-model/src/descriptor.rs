//! Parsing of JVM type signatures (`Ljava/util/List<TT;>;`, `[I`, `TK;`) into [`JavaType`].
//!
//! This is the format class files use for generic signatures, so loaders can hand us the raw
//! attribute text. Plain descriptors are a subset and parse as well.

use crate::error::{LoadError, Result};
use crate::types::{JavaType, PrimitiveType, TypeArgument, WildcardBound};

/// Parse a field type signature. `V` is rejected; use [`parse_return_signature`] for returns.
pub fn parse_type_signature(sig: &str) -> Result<JavaType> {
    let (ty, rest) = parse_field_type(sig, sig)?;
    if !rest.is_empty() {
        return Err(LoadError::InvalidSignature(sig.to_string()));
    }
    Ok(ty)
}

/// Parse a return type signature: either `V` or a field type signature.
pub fn parse_return_signature(sig: &str) -> Result<JavaType> {
    if sig == "V" {
        return Ok(JavaType::Void);
    }
    parse_type_signature(sig)
}

fn parse_field_type<'a>(input: &'a str, whole: &str) -> Result<(JavaType, &'a str)> {
    let invalid = || LoadError::InvalidSignature(whole.to_string());
    let first = input.chars().next().ok_or_else(invalid)?;
    let rest = &input[first.len_utf8()..];
    let primitive = |p| -> Result<(JavaType, &'a str)> { Ok((JavaType::Primitive(p), rest)) };
    match first {
        'B' => primitive(PrimitiveType::Byte),
        'C' => primitive(PrimitiveType::Char),
        'D' => primitive(PrimitiveType::Double),
        'F' => primitive(PrimitiveType::Float),
        'I' => primitive(PrimitiveType::Int),
        'J' => primitive(PrimitiveType::Long),
        'S' => primitive(PrimitiveType::Short),
        'Z' => primitive(PrimitiveType::Boolean),
        'T' => {
            let end = rest.find(';').ok_or_else(invalid)?;
            let name = &rest[..end];
            if name.is_empty() {
                return Err(invalid());
            }
            Ok((JavaType::type_var(name), &rest[end + 1..]))
        }
        '[' => {
            let (component, rest) = parse_field_type(rest, whole)?;
            Ok((JavaType::array(component), rest))
        }
        'L' => parse_class_type(rest, whole),
        _ => Err(invalid()),
    }
}

/// Parses the remainder of an `L...;` class type signature. Inner class suffixes
/// (`Outer<TT;>.Inner<TU;>`) keep only the innermost type arguments, which is all the
/// enhancement pass looks at.
fn parse_class_type<'a>(mut input: &'a str, whole: &str) -> Result<(JavaType, &'a str)> {
    let invalid = || LoadError::InvalidSignature(whole.to_string());
    let mut name = String::new();
    let mut args = Vec::new();

    loop {
        let end = input.find(['<', ';', '.']).ok_or_else(invalid)?;
        let segment = &input[..end];
        if segment.is_empty() {
            return Err(invalid());
        }
        if !name.is_empty() {
            name.push('$');
        }
        name.push_str(&segment.replace('/', "."));
        input = &input[end..];

        args.clear();
        if let Some(rest) = input.strip_prefix('<') {
            let (parsed, rest) = parse_type_arguments(rest, whole)?;
            args = parsed;
            input = rest;
        }

        if let Some(rest) = input.strip_prefix(';') {
            return Ok((JavaType::class(name, args), rest));
        }
        if let Some(rest) = input.strip_prefix('.') {
            input = rest;
            continue;
        }
        return Err(invalid());
    }
}

fn parse_type_arguments<'a>(mut input: &'a str, whole: &str) -> Result<(Vec<TypeArgument>, &'a str)> {
    let mut args = Vec::new();
    loop {
        if let Some(rest) = input.strip_prefix('>') {
            if args.is_empty() {
                return Err(LoadError::InvalidSignature(whole.to_string()));
            }
            return Ok((args, rest));
        }
        if let Some(rest) = input.strip_prefix('*') {
            args.push(TypeArgument::Wildcard(WildcardBound::Unbounded));
            input = rest;
        } else if let Some(rest) = input.strip_prefix('+') {
            let (bound, rest) = parse_field_type(rest, whole)?;
            args.push(TypeArgument::Wildcard(WildcardBound::Extends(Box::new(bound))));
            input = rest;
        } else if let Some(rest) = input.strip_prefix('-') {
            let (bound, rest) = parse_field_type(rest, whole)?;
            args.push(TypeArgument::Wildcard(WildcardBound::Super(Box::new(bound))));
            input = rest;
        } else {
            let (ty, rest) = parse_field_type(input, whole)?;
            args.push(TypeArgument::Type(ty));
            input = rest;
        }
    }
}
