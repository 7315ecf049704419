//! Derived view operations over in-process buffers

#![cfg_attr(miri, allow(unused))]

use memscope::{Address, LocalView, MemView, Ptr, Utf16, Utf8};

fn addr_of<T>(value: &T) -> Address {
    Address::new(value as *const T as usize)
}

#[test]
#[cfg_attr(miri, ignore = "reads through integer-derived pointers")]
fn test_value_round_trip() {
    let view = LocalView::new();
    let mut cell: u32 = 0;
    let address = Address::new(&mut cell as *mut u32 as usize);

    assert!(view.write_value(address, 0xDEAD_BEEFu32));
    assert_eq!(view.read_value::<u32>(address), Some(0xDEAD_BEEF));
    assert_eq!(cell, 0xDEAD_BEEF);
}

#[test]
#[cfg_attr(miri, ignore = "reads through integer-derived pointers")]
fn test_value_round_trip_at_offsets() {
    let view = LocalView::new();
    let mut buffer = [0u8; 64];
    let base = Address::from(buffer.as_mut_ptr());

    for offset in [0usize, 1, 7, 56] {
        let at = base.wrapping_add(offset);
        assert!(view.write_value(at, 0x1122_3344_5566_7788u64));
        assert_eq!(view.read_value::<u64>(at), Some(0x1122_3344_5566_7788));
    }
}

#[test]
#[cfg_attr(miri, ignore = "reads through integer-derived pointers")]
fn test_array_round_trip() {
    let view = LocalView::new();
    let mut buffer = [0u8; 40];
    let base = Address::from(buffer.as_mut_ptr());

    let values: [u32; 10] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9];
    assert_eq!(view.write_array(base, &values), 10);
    assert_eq!(view.read_array::<u32>(base, 10), values);
}

#[test]
#[cfg_attr(miri, ignore = "reads through integer-derived pointers")]
fn test_array_trims_to_whole_values() {
    let view = LocalView::new();
    let buffer = [0xAAu8; 10];
    let base = Address::from(buffer.as_ptr());

    // Only two whole u32 values fit in ten bytes.
    let read = view.read_array::<u32>(base, 2);
    assert_eq!(read, [0xAAAA_AAAA, 0xAAAA_AAAA]);
}

#[test]
fn test_zero_sized_payload_never_divides() {
    let view = LocalView::new();
    let values: Vec<[u8; 0]> = view.read_array(Address::new(0x1000), 8);
    assert!(values.is_empty());
    assert_eq!(view.write_array(Address::new(0x1000), &[[]; 4] as &[[u8; 0]]), 0);
}

#[test]
#[cfg_attr(miri, ignore = "reads through integer-derived pointers")]
fn test_utf8_string_round_trip() {
    let view = LocalView::new();
    let mut buffer = [0u8; 64];
    let base = Address::from(buffer.as_mut_ptr());

    assert!(view.write_string::<Utf8>(base, "héllo", true));
    assert_eq!(view.read_string::<Utf8>(base, 5, true), "héllo");
}

#[test]
#[cfg_attr(miri, ignore = "reads through integer-derived pointers")]
fn test_utf16_string_round_trip() {
    let view = LocalView::new();
    let mut buffer = [0u8; 64];
    let base = Address::from(buffer.as_mut_ptr());

    assert!(view.write_string::<Utf16>(base, "wörld 𝄞", true));
    assert_eq!(view.read_string::<Utf16>(base, 7, true), "wörld 𝄞");
}

#[test]
#[cfg_attr(miri, ignore = "reads through integer-derived pointers")]
fn test_string_truncates_to_max_chars() {
    let view = LocalView::new();
    let mut buffer = [0u8; 64];
    let base = Address::from(buffer.as_mut_ptr());

    assert!(view.write_string::<Utf8>(base, "abcdef", false));
    assert_eq!(view.read_string::<Utf8>(base, 3, false), "abc");
}

#[test]
#[cfg_attr(miri, ignore = "reads through integer-derived pointers")]
fn test_string_without_terminator_reads_past_zero() {
    let view = LocalView::new();
    let mut buffer = [0u8; 16];
    buffer[0] = b'a';
    buffer[1] = 0;
    buffer[2] = b'b';
    let base = Address::from(buffer.as_ptr());

    assert_eq!(view.read_string::<Utf8>(base, 1, true), "a");
    assert_eq!(view.read_string::<Utf8>(base, 3, false), "a\0b");
}

#[test]
#[cfg_attr(miri, ignore = "reads through integer-derived pointers")]
fn test_pointer_array_reattaches_view() {
    let view = LocalView::new();
    let mut slots = [0usize; 3];
    let base = Address::from(slots.as_mut_ptr() as *mut u8);

    let targets = [
        view.ptr(Address::new(0x1000)),
        view.ptr(Address::new(0x2000)),
        view.ptr(Address::new(0x3000)),
    ];
    assert_eq!(view.write_ptr_array(base, &targets), 3);
    assert_eq!(slots, [0x1000, 0x2000, 0x3000]);

    let back = view.read_ptr_array(base, 3);
    assert_eq!(back.len(), 3);
    assert_eq!(back[0].address(), Address::new(0x1000));
    assert_eq!(back[2].address(), Address::new(0x3000));
}

#[test]
#[cfg_attr(miri, ignore = "reads through integer-derived pointers")]
fn test_raw_pointer_deref() {
    let view = LocalView::new();
    let target: u64 = 42;
    let slot: usize = &target as *const u64 as usize;
    let pointer = view.ptr(addr_of(&slot));

    let followed = pointer.deref().unwrap();
    assert_eq!(followed.address(), Address::new(slot));
    assert_eq!(followed.read_value::<u64>(), Some(42));
}

#[test]
#[cfg_attr(miri, ignore = "reads through integer-derived pointers")]
fn test_typed_pointer_chain_in_place() {
    let view = LocalView::new();
    let value: u32 = 0xCAFE_F00D;
    let slot: usize = &value as *const u32 as usize;

    let head = view.typed_ptr::<Ptr<u32>>(addr_of(&slot));
    let tail = head.deref_ptr().unwrap();
    assert_eq!(tail.address(), Address::new(slot));
    assert_eq!(tail.deref(), Some(0xCAFE_F00D));
}

#[test]
fn test_read_value_fails_on_unreadable_address() {
    let view = LocalView::new();
    // Null short-circuits before any copy is attempted.
    assert_eq!(view.read_value::<u64>(Address::null()), None);
    assert!(!view.write_value(Address::null(), 1u64));
}
