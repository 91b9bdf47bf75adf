use scout_core::decoder::{
    decode_account_record, encode_account_record, length_prefix, strip_discriminator,
    DecodeError, EncodeError,
};
use scout_core::model::{AccountRecord, Pubkey};

fn sample_record() -> AccountRecord {
    AccountRecord {
        address: Pubkey::new([7u8; 32]),
        signer: Pubkey::new([9u8; 32]),
        version: "0.4.1".into(),
        git_url: "https://github.com/example/vault".into(),
        commit: "3f2a9c1".into(),
        args: vec!["--library-name".into(), "programs/vault".into(), "--".into()],
        deploy_slot: 312_456_789,
        bump: 254,
    }
}

#[test]
fn decodes_what_the_layout_encodes() {
    let record = sample_record();
    let bytes = encode_account_record(&record).expect("encode");
    let decoded = decode_account_record(&bytes).expect("decode");
    assert_eq!(decoded, record);
}

#[test]
fn decodes_hand_built_buffer_little_endian() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&[1u8; 32]);
    buf.extend_from_slice(&[2u8; 32]);
    buf.extend_from_slice(&[3, 0, 0, 0]);
    buf.extend_from_slice(b"1.0");
    buf.extend_from_slice(&[0, 0, 0, 0]); // empty git_url
    buf.extend_from_slice(&[2, 0, 0, 0]);
    buf.extend_from_slice(b"ab");
    buf.extend_from_slice(&[0, 0, 0, 0]); // no args
    buf.extend_from_slice(&0x0102_0304_0506_0708u64.to_le_bytes());
    buf.push(7);

    let record = decode_account_record(&buf).expect("decode");
    assert_eq!(record.address, Pubkey::new([1u8; 32]));
    assert_eq!(record.signer, Pubkey::new([2u8; 32]));
    assert_eq!(record.version, "1.0");
    assert_eq!(record.git_url, "");
    assert_eq!(record.commit, "ab");
    assert!(record.args.is_empty());
    assert_eq!(record.deploy_slot, 0x0102_0304_0506_0708);
    assert_eq!(record.bump, 7);
}

#[test]
fn truncated_inside_version_length_prefix() {
    let bytes = encode_account_record(&sample_record()).expect("encode");
    let err = decode_account_record(&bytes[..66]).unwrap_err();
    assert_eq!(
        err,
        DecodeError::TruncatedRecord { field: "version", offset: 64, needed: 4, available: 2 }
    );
}

#[test]
fn truncated_inside_version_bytes() {
    let bytes = encode_account_record(&sample_record()).expect("encode");
    let err = decode_account_record(&bytes[..70]).unwrap_err();
    assert!(matches!(err, DecodeError::TruncatedRecord { field: "version", offset: 68, .. }));
}

#[test]
fn every_strict_prefix_fails_as_truncated() {
    let bytes = encode_account_record(&sample_record()).expect("encode");
    for len in 0..bytes.len() {
        match decode_account_record(&bytes[..len]) {
            Err(DecodeError::TruncatedRecord { .. }) => {}
            other => panic!("prefix of {len} bytes: expected TruncatedRecord, got {other:?}"),
        }
    }
}

#[test]
fn empty_buffer_fails_on_address() {
    let err = decode_account_record(&[]).unwrap_err();
    assert!(matches!(err, DecodeError::TruncatedRecord { field: "address", available: 0, .. }));
}

#[test]
fn invalid_utf8_in_git_url_is_reported_with_field_name() {
    let mut record = sample_record();
    record.git_url = "xxxx".into();
    let mut bytes = encode_account_record(&record).expect("encode");
    // address + signer + version prefix/body + git_url prefix
    let git_url_start = 64 + 4 + record.version.len() + 4;
    bytes[git_url_start] = 0xff;
    bytes[git_url_start + 1] = 0xfe;

    let err = decode_account_record(&bytes).unwrap_err();
    assert!(matches!(err, DecodeError::InvalidEncoding { field: "git_url", .. }));
    assert!(err.to_string().contains("git_url"));
}

#[test]
fn invalid_utf8_in_an_argument() {
    let mut record = sample_record();
    record.args = vec!["ok".into(), "zz".into()];
    let mut bytes = encode_account_record(&record).expect("encode");
    let last_arg = bytes.len() - 8 - 1 - 2;
    bytes[last_arg] = 0xc3; // lead byte without continuation
    let err = decode_account_record(&bytes).unwrap_err();
    assert!(matches!(err, DecodeError::InvalidEncoding { field: "args", .. }));
}

#[test]
fn oversized_length_prefix_is_truncation_not_panic() {
    let mut bytes = vec![0u8; 64];
    bytes.extend_from_slice(&u32::MAX.to_le_bytes());
    bytes.extend_from_slice(b"short");
    let err = decode_account_record(&bytes).unwrap_err();
    assert_eq!(
        err,
        DecodeError::TruncatedRecord {
            field: "version",
            offset: 68,
            needed: u32::MAX as usize,
            available: 5,
        }
    );
}

#[test]
fn huge_argument_count_fails_without_allocating_for_it() {
    let mut record = sample_record();
    record.args.clear();
    let mut bytes = encode_account_record(&record).expect("encode");
    let count_at = bytes.len() - 8 - 1 - 4;
    bytes[count_at..count_at + 4].copy_from_slice(&u32::MAX.to_le_bytes());
    let err = decode_account_record(&bytes).unwrap_err();
    assert!(matches!(err, DecodeError::TruncatedRecord { field: "args", .. }));
}

#[test]
fn trailing_bytes_after_bump_are_ignored() {
    let record = sample_record();
    let mut bytes = encode_account_record(&record).expect("encode");
    bytes.extend_from_slice(&[0u8; 128]);
    assert_eq!(decode_account_record(&bytes).expect("decode"), record);
}

#[test]
fn decoding_leaves_input_untouched() {
    let bytes = encode_account_record(&sample_record()).expect("encode");
    let copy = bytes.clone();
    let _ = decode_account_record(&bytes);
    assert_eq!(bytes, copy);
}

#[test]
fn strip_discriminator_drops_leading_tag() {
    let record = sample_record();
    let mut raw = vec![0xAA; 8];
    raw.extend_from_slice(&encode_account_record(&record).expect("encode"));
    let payload = strip_discriminator(&raw, 8).expect("strip");
    assert_eq!(decode_account_record(payload).expect("decode"), record);
}

#[test]
fn strip_discriminator_rejects_short_buffer() {
    let err = strip_discriminator(&[1, 2, 3], 8).unwrap_err();
    assert_eq!(
        err,
        DecodeError::TruncatedRecord { field: "discriminator", offset: 0, needed: 8, available: 3 }
    );
}

#[test]
fn length_prefix_is_little_endian_u32() {
    assert_eq!(length_prefix("version", 3), Ok([3, 0, 0, 0]));
    assert_eq!(length_prefix("args_count", u32::MAX as usize), Ok([0xff; 4]));
}

#[cfg(target_pointer_width = "64")]
#[test]
fn length_prefix_rejects_lengths_beyond_u32() {
    let len = u32::MAX as usize + 1;
    let err = length_prefix("git_url", len).unwrap_err();
    assert_eq!(err, EncodeError { field: "git_url", len });
    assert!(err.to_string().contains("git_url"));
}
