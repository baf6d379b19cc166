#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use apiscan_scanner::classfile::signature::{
    parse_class_signature, parse_field_descriptor, parse_field_signature,
    parse_method_descriptor, parse_method_signature,
};
use apiscan_scanner::render::{render_java_type, render_type_params};

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    kind: FuzzKind,
    text: String,
}

#[derive(Arbitrary, Debug)]
enum FuzzKind {
    FieldDescriptor,
    MethodDescriptor,
    FieldSignature,
    MethodSignature,
    ClassSignature,
}

fuzz_target!(|input: FuzzInput| {
    match input.kind {
        FuzzKind::FieldDescriptor => {
            if let Ok(ty) = parse_field_descriptor(&input.text) {
                let _ = render_java_type(&ty);
            }
        }
        FuzzKind::MethodDescriptor => {
            if let Ok(sig) = parse_method_descriptor(&input.text) {
                sig.params.iter().for_each(|p| {
                    let _ = render_java_type(p);
                });
                let _ = render_java_type(&sig.return_type);
            }
        }
        FuzzKind::FieldSignature => {
            if let Ok(ty) = parse_field_signature(&input.text) {
                let _ = render_java_type(&ty);
            }
        }
        FuzzKind::MethodSignature => {
            if let Ok(sig) = parse_method_signature(&input.text) {
                let _ = render_type_params(&sig.type_params);
                let _ = render_java_type(&sig.return_type);
            }
        }
        FuzzKind::ClassSignature => {
            if let Ok(sig) = parse_class_signature(&input.text) {
                let _ = render_type_params(&sig.type_params);
            }
        }
    }
});
