#![no_main]

use libfuzzer_sys::fuzz_target;
use apiscan_scanner::classfile::parse_class;
use apiscan_scanner::filter::MemberFilter;
use apiscan_scanner::ordering::type_block;
use apiscan_scanner::types::TypeDescriptor;

// 임의 바이트 -> 디코딩 -> 렌더링까지 패닉이 없어야 함
fuzz_target!(|data: &[u8]| {
    let Ok(class) = parse_class(data) else {
        return;
    };
    if let Ok(ty) = TypeDescriptor::from_class_file(&class) {
        let _ = type_block(&ty, &MemberFilter::default());
    }
});
