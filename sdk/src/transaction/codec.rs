//! Canonical field mapping for transactions.
//!
//! Every transaction is one flat map: header keys plus the keys of its
//! type. Decoding reads `type` first, takes exactly the keys that type may
//! carry, and rejects whatever is left, so a payment carrying `xaid` is an
//! error rather than a payment.

use super::builder::{Header, Transaction};
use super::types::{
    ApplicationCall, AssetConfig, AssetFreeze, AssetParams, AssetTransfer, KeyRegistration,
    OnComplete, Payment, StateSchema, TransactionKind, TransactionType,
};
use crate::encoding::value::{expect_bytes, expect_uint, fixed_from_slice};
use crate::encoding::{Canonical, DecodeError, MapBuilder, MapReader, Value};
use crate::identity::address::Address;

fn read_address(reader: &mut MapReader, key: &str) -> Result<Address, DecodeError> {
    reader.fixed::<32>(key).map(Address::new)
}

impl Canonical for Transaction {
    fn to_value(&self) -> Value {
        let h = &self.header;
        let map = MapBuilder::new()
            .uint("fee", h.fee)
            .uint("fv", h.first_valid)
            .uint("lv", h.last_valid)
            .fixed("gh", &h.genesis_hash)
            .string("gen", &h.genesis_id)
            .bytes("note", &h.note)
            .optional_fixed("grp", h.group.as_ref().map(|g| g.as_slice()))
            .optional_fixed("lx", h.lease.as_ref().map(|l| l.as_slice()))
            .fixed("rekey", h.rekey_to.as_bytes())
            .fixed("snd", h.sender.as_bytes())
            .string("type", self.kind.tx_type().as_str());
        kind_fields(map, &self.kind).build()
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        let mut r = MapReader::new(value, "txn")?;
        let tag = r.string("type")?;
        if tag.is_empty() {
            return Err(DecodeError::MissingField {
                field: r.field("type"),
            });
        }
        let tx_type =
            TransactionType::from_tag(&tag).ok_or(DecodeError::UnknownTransactionType(tag))?;

        let header = Header {
            sender: read_address(&mut r, "snd")?,
            fee: r.uint("fee")?,
            first_valid: r.uint("fv")?,
            last_valid: r.uint("lv")?,
            genesis_hash: r.fixed("gh")?,
            genesis_id: r.string("gen")?,
            note: r.bytes("note")?,
            group: r.optional_fixed("grp")?,
            lease: r.optional_fixed("lx")?,
            rekey_to: read_address(&mut r, "rekey")?,
        };
        let kind = read_kind(&mut r, tx_type)?;
        r.finish()?;
        Ok(Transaction::from_parts(header, kind))
    }
}

fn schema_value(schema: &StateSchema) -> Value {
    MapBuilder::new()
        .uint("nbs", schema.num_byte_slices)
        .uint("nui", schema.num_uints)
        .build()
}

fn kind_fields(map: MapBuilder, kind: &TransactionKind) -> MapBuilder {
    match kind {
        TransactionKind::Payment(p) => map
            .fixed("rcv", p.receiver.as_bytes())
            .uint("amt", p.amount)
            .fixed("close", p.close_remainder_to.as_bytes()),
        TransactionKind::KeyRegistration(k) => map
            .optional_fixed("votekey", k.vote_key.as_ref().map(|v| v.as_slice()))
            .optional_fixed("selkey", k.selection_key.as_ref().map(|v| v.as_slice()))
            .optional_fixed("sprfkey", k.state_proof_key.as_ref().map(|v| v.as_slice()))
            .uint("votefst", k.vote_first)
            .uint("votelst", k.vote_last)
            .uint("votekd", k.vote_key_dilution)
            .boolean("nonpart", k.non_participation),
        TransactionKind::AssetConfig(c) => {
            let map = map.uint("caid", c.asset_id);
            match &c.params {
                Some(p) => map.value("apar", asset_params_value(p)),
                None => map,
            }
        }
        TransactionKind::AssetTransfer(t) => map
            .uint("xaid", t.asset_id)
            .uint("aamt", t.amount)
            .fixed("arcv", t.receiver.as_bytes())
            .fixed("aclose", t.close_assets_to.as_bytes())
            .fixed("asnd", t.revocation_target.as_bytes()),
        TransactionKind::AssetFreeze(f) => map
            .uint("faid", f.asset_id)
            .fixed("fadd", f.target.as_bytes())
            .boolean("afrz", f.frozen),
        TransactionKind::ApplicationCall(a) => map
            .uint("apid", a.app_id)
            .uint("apan", a.on_complete.as_u64())
            .bytes("apap", &a.approval_program)
            .bytes("apsu", &a.clear_program)
            .value("apgs", schema_value(&a.global_schema))
            .value("apls", schema_value(&a.local_schema))
            .array("apaa", a.args.iter().map(|b| Value::Bytes(b.clone())).collect())
            .array(
                "apat",
                a.accounts.iter().map(|x| Value::Bytes(x.as_bytes().to_vec())).collect(),
            )
            .array("apfa", a.foreign_apps.iter().map(|n| Value::Uint(*n)).collect())
            .array("apas", a.foreign_assets.iter().map(|n| Value::Uint(*n)).collect())
            .uint("apep", a.extra_pages as u64),
    }
}

fn asset_params_value(p: &AssetParams) -> Value {
    MapBuilder::new()
        .uint("t", p.total)
        .uint("dc", p.decimals as u64)
        .boolean("df", p.default_frozen)
        .string("un", &p.unit_name)
        .string("an", &p.asset_name)
        .string("au", &p.url)
        .optional_fixed("am", p.metadata_hash.as_ref().map(|m| m.as_slice()))
        .fixed("m", p.manager.as_bytes())
        .fixed("r", p.reserve.as_bytes())
        .fixed("f", p.freeze.as_bytes())
        .fixed("c", p.clawback.as_bytes())
        .build()
}

fn read_asset_params(mut r: MapReader) -> Result<AssetParams, DecodeError> {
    let decimals = r.uint("dc")?;
    let params = AssetParams {
        total: r.uint("t")?,
        decimals: u32::try_from(decimals).map_err(|_| DecodeError::InvalidField {
            field: r.field("dc"),
            reason: format!("{} does not fit in 32 bits", decimals),
        })?,
        default_frozen: r.boolean("df")?,
        unit_name: r.string("un")?,
        asset_name: r.string("an")?,
        url: r.string("au")?,
        metadata_hash: r.optional_fixed("am")?,
        manager: read_address(&mut r, "m")?,
        reserve: read_address(&mut r, "r")?,
        freeze: read_address(&mut r, "f")?,
        clawback: read_address(&mut r, "c")?,
    };
    r.finish()?;
    Ok(params)
}

fn read_schema(r: &mut MapReader, key: &str) -> Result<StateSchema, DecodeError> {
    match r.map(key, "schema")? {
        None => Ok(StateSchema::default()),
        Some(mut s) => {
            let schema = StateSchema {
                num_uints: s.uint("nui")?,
                num_byte_slices: s.uint("nbs")?,
            };
            s.finish()?;
            Ok(schema)
        }
    }
}

fn read_kind(r: &mut MapReader, tx_type: TransactionType) -> Result<TransactionKind, DecodeError> {
    let kind = match tx_type {
        TransactionType::Payment => TransactionKind::Payment(Payment {
            receiver: read_address(r, "rcv")?,
            amount: r.uint("amt")?,
            close_remainder_to: read_address(r, "close")?,
        }),
        TransactionType::KeyRegistration => TransactionKind::KeyRegistration(KeyRegistration {
            vote_key: r.optional_fixed("votekey")?,
            selection_key: r.optional_fixed("selkey")?,
            state_proof_key: r.optional_fixed("sprfkey")?,
            vote_first: r.uint("votefst")?,
            vote_last: r.uint("votelst")?,
            vote_key_dilution: r.uint("votekd")?,
            non_participation: r.boolean("nonpart")?,
        }),
        TransactionType::AssetConfig => {
            let asset_id = r.uint("caid")?;
            let params = match r.map("apar", "apar")? {
                Some(p) => Some(read_asset_params(p)?),
                None => None,
            };
            TransactionKind::AssetConfig(AssetConfig { asset_id, params })
        }
        TransactionType::AssetTransfer => TransactionKind::AssetTransfer(AssetTransfer {
            asset_id: r.uint("xaid")?,
            amount: r.uint("aamt")?,
            receiver: read_address(r, "arcv")?,
            close_assets_to: read_address(r, "aclose")?,
            revocation_target: read_address(r, "asnd")?,
        }),
        TransactionType::AssetFreeze => TransactionKind::AssetFreeze(AssetFreeze {
            asset_id: r.uint("faid")?,
            target: read_address(r, "fadd")?,
            frozen: r.boolean("afrz")?,
        }),
        TransactionType::ApplicationCall => {
            let code = r.uint("apan")?;
            let on_complete = OnComplete::from_u64(code).ok_or_else(|| DecodeError::InvalidField {
                field: r.field("apan"),
                reason: format!("unknown on-completion code {}", code),
            })?;
            let extra_pages = r.uint("apep")?;
            let args = r
                .array("apaa")?
                .into_iter()
                .map(|v| expect_bytes(v, r.field("apaa")))
                .collect::<Result<Vec<_>, _>>()?;
            let accounts = r
                .array("apat")?
                .into_iter()
                .map(|v| {
                    let raw = expect_bytes(v, r.field("apat"))?;
                    fixed_from_slice::<32>(&raw, r.field("apat")).map(Address::new)
                })
                .collect::<Result<Vec<_>, _>>()?;
            let foreign_apps = r
                .array("apfa")?
                .into_iter()
                .map(|v| expect_uint(v, r.field("apfa")))
                .collect::<Result<Vec<_>, _>>()?;
            let foreign_assets = r
                .array("apas")?
                .into_iter()
                .map(|v| expect_uint(v, r.field("apas")))
                .collect::<Result<Vec<_>, _>>()?;
            TransactionKind::ApplicationCall(ApplicationCall {
                app_id: r.uint("apid")?,
                on_complete,
                approval_program: r.bytes("apap")?,
                clear_program: r.bytes("apsu")?,
                global_schema: read_schema(r, "apgs")?,
                local_schema: read_schema(r, "apls")?,
                args,
                accounts,
                foreign_apps,
                foreign_assets,
                extra_pages: u32::try_from(extra_pages).map_err(|_| DecodeError::InvalidField {
                    field: r.field("apep"),
                    reason: format!("{} does not fit in 32 bits", extra_pages),
                })?,
            })
        }
    };
    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{decode, encode, from_base64};
    use crate::transaction::builder::TransactionBuilder;
    use crate::transaction::types::SuggestedParams;

    fn params() -> SuggestedParams {
        SuggestedParams {
            fee: 1000,
            first_valid: 100,
            last_valid: 1100,
            genesis_hash: [9; 32],
            genesis_id: "testnet-v1.0".into(),
            flat_fee: true,
        }
    }

    fn roundtrip(kind: TransactionKind) -> Transaction {
        let txn = TransactionBuilder::new(Address::new([1; 32]), &params(), kind)
            .strict_empty_address_check(false)
            .note(b"n".to_vec())
            .lease([4; 32])
            .rekey_to(Address::new([5; 32]))
            .build()
            .unwrap();
        let bytes = txn.to_canonical_bytes();
        let back = Transaction::from_canonical_bytes(&bytes).unwrap();
        assert_eq!(back, txn);
        assert_eq!(back.to_canonical_bytes(), bytes);
        txn
    }

    #[test]
    fn every_kind_roundtrips() {
        let a = Address::new([2; 32]);
        roundtrip(TransactionKind::payment(a, 10));
        roundtrip(TransactionKind::close_account(a, 10, Address::new([3; 32])));
        roundtrip(TransactionKind::keyreg_online([1; 32], [2; 32], Some([3; 64]), 1, 10, 10));
        roundtrip(TransactionKind::keyreg_offline());
        roundtrip(TransactionKind::keyreg_nonparticipating());
        roundtrip(TransactionKind::asset_create(AssetParams {
            total: 100,
            decimals: 2,
            default_frozen: true,
            unit_name: "tst".into(),
            asset_name: "Test".into(),
            url: "https://example.com".into(),
            metadata_hash: Some([6; 32]),
            manager: a,
            reserve: a,
            freeze: a,
            clawback: a,
        }));
        roundtrip(TransactionKind::asset_reconfigure(7, a, Address::ZERO, a, a));
        roundtrip(TransactionKind::asset_destroy(7));
        roundtrip(TransactionKind::asset_opt_in(7, a));
        roundtrip(TransactionKind::asset_revoke(7, 5, a, Address::new([3; 32])));
        roundtrip(TransactionKind::asset_freeze(7, a, true));
        roundtrip(TransactionKind::ApplicationCall(ApplicationCall {
            app_id: 0,
            on_complete: OnComplete::OptIn,
            approval_program: vec![6, 0x81, 1],
            clear_program: vec![6, 0x81, 1],
            global_schema: StateSchema { num_uints: 1, num_byte_slices: 2 },
            local_schema: StateSchema { num_uints: 3, num_byte_slices: 0 },
            args: vec![vec![], vec![1, 2]],
            accounts: vec![a],
            foreign_apps: vec![0, 9],
            foreign_assets: vec![7],
            extra_pages: 1,
        }));
    }

    #[test]
    fn header_key_order() {
        let txn = roundtrip(TransactionKind::payment(Address::new([2; 32]), 10));
        let keys: Vec<String> = match decode(&txn.to_canonical_bytes()).unwrap() {
            Value::Map(m) => m.into_keys().collect(),
            _ => panic!("not a map"),
        };
        assert_eq!(
            keys,
            ["amt", "fee", "fv", "gen", "gh", "lv", "lx", "note", "rcv", "rekey", "snd", "type"]
        );
    }

    #[test]
    fn upstream_payment_bytes() {
        // Payment with a per-byte fee of 4: the fee settles at 294 * 4.
        let sender: Address = "PNWOET7LLOWMBMLE4KOCELCX6X3D3Q4H2Q4QJASYIEOF7YIPPQBG3YQ5YI"
            .parse()
            .unwrap();
        let close: Address = "IDUTJEUIEVSMXTU4LGTJWZ2UE2E6TIODUKU6UW3FU3UKIQQ77RLUBBBFLA"
            .parse()
            .unwrap();
        let gh = from_base64("JgsgCaCTqIaLeVhyL6XlRu3n7Rfk2FxMeK+wRSaQ7dI=").unwrap();
        let params = SuggestedParams {
            fee: 4,
            first_valid: 12466,
            last_valid: 13466,
            genesis_hash: gh.as_slice().try_into().unwrap(),
            genesis_id: "devnet-v33.0".into(),
            flat_fee: false,
        };
        let txn = TransactionBuilder::new(
            sender,
            &params,
            TransactionKind::close_account(sender, 1000, close),
        )
        .note(from_base64("6gAVR0Nsv5Y=").unwrap())
        .build()
        .unwrap();
        assert_eq!(txn.fee(), 1176);
        assert_eq!(
            hex::encode(txn.to_canonical_bytes()),
            "8ba3616d74cd03e8a5636c6f7365c42040e93492882564cbce9c59a69b67542689e9a1c3a2a9ea5b65a6e8a4421ffc57a3666565cd0498a26676cd30b2a367656eac6465766e65742d7633332e30a26768c420260b2009a093a8868b7958722fa5e546ede7ed17e4d85c4c78afb0452690edd2a26c76cd349aa46e6f7465c408ea001547436cbf96a3726376c4207b6ce24feb5bacc0b164e29c222c57f5f63dc387d439048258411c5fe10f7c02a3736e64c4207b6ce24feb5bacc0b164e29c222c57f5f63dc387d439048258411c5fe10f7c02a474797065a3706179"
        );
    }

    #[test]
    fn foreign_key_rejected() {
        let txn = roundtrip(TransactionKind::payment(Address::new([2; 32]), 10));
        let mut value = txn.to_value();
        if let Value::Map(m) = &mut value {
            m.insert("xaid".into(), Value::Uint(5));
        }
        assert!(matches!(
            Transaction::from_canonical_bytes(&encode(&value)),
            Err(DecodeError::UnknownField { field, .. }) if field == "xaid"
        ));
    }

    #[test]
    fn unknown_type_rejected() {
        let value = MapBuilder::new().string("type", "bogus").uint("fv", 1).build();
        assert!(matches!(
            Transaction::from_value(value),
            Err(DecodeError::UnknownTransactionType(t)) if t == "bogus"
        ));
    }

    #[test]
    fn missing_type_rejected() {
        let value = MapBuilder::new().uint("fv", 1).build();
        assert!(matches!(Transaction::from_value(value), Err(DecodeError::MissingField { .. })));
    }

    #[test]
    fn explicit_zero_address_rejected() {
        let txn = roundtrip(TransactionKind::payment(Address::new([2; 32]), 10));
        let mut value = txn.to_value();
        if let Value::Map(m) = &mut value {
            m.insert("close".into(), Value::Bytes(vec![0; 32]));
        }
        assert!(matches!(
            Transaction::from_value(value),
            Err(DecodeError::ExplicitZero { .. })
        ));
    }

    #[test]
    fn short_address_rejected() {
        let txn = roundtrip(TransactionKind::payment(Address::new([2; 32]), 10));
        let mut value = txn.to_value();
        if let Value::Map(m) = &mut value {
            m.insert("rcv".into(), Value::Bytes(vec![1; 31]));
        }
        assert!(matches!(
            Transaction::from_value(value),
            Err(DecodeError::WrongLength { expected: 32, found: 31, .. })
        ));
    }
}
