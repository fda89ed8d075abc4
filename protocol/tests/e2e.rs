//! End-to-end integration tests for the FSPIOP protocol core.
//!
//! These tests walk the two flows a participant actually runs: a payee FSP
//! answering a quote with ILP artifacts that the payer FSP later checks a
//! transfer against, and a signed FSPIOP request crossing from one FSP to
//! another. Only the public API is used.

use std::sync::Arc;

use serde_json::json;

use fspiop_protocol::crypto::base64url_encode;
use fspiop_protocol::ilp::{self, IlpCodec, IlpError, IlpOptions, IlpVersion};
use fspiop_protocol::jws::{JwsError, JwsRequest, JwsSigner, JwsValidator, ValidationKeys};
use fspiop_protocol::logging::TracingLogger;
use fspiop_protocol::transaction::{
    Amount, ConversionTerms, FxMoney, FxQuoteRequest, FxQuoteResponse, Party, PartyIdInfo,
    QuoteRequest, QuoteResponse, TransactionObject, TransactionType, TransferRequest,
};

const PAYER_PRIVATE: &[u8] = include_bytes!("fixtures/payer_private.pem");
const PAYER_PUBLIC: &[u8] = include_bytes!("fixtures/payer_public.pem");
const OTHER_PUBLIC: &[u8] = include_bytes!("fixtures/other_public.pem");

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn engine(version: IlpVersion) -> ilp::Engine {
    ilp::create(
        version,
        IlpOptions::new("test", Arc::new(TracingLogger::new("e2e"))),
    )
    .expect("engine")
}

fn quote_request() -> QuoteRequest {
    QuoteRequest {
        quote_id: "b51ec534-ee48-4575-b6a9-ead2955b8069".to_string(),
        transaction_id: "a8323bc6-c228-4df2-ae82-e5a997baf898".to_string(),
        transaction_request_id: None,
        payee: Party::new(PartyIdInfo::new("MSISDN", "27713803912", "payeefsp")),
        payer: Party::new(PartyIdInfo::new("MSISDN", "17039811902", "payerfsp")),
        amount_type: "RECEIVE".to_string(),
        amount: Amount::new("100", "USD"),
        fees: None,
        transaction_type: TransactionType::new("TRANSFER", "PAYER", "CONSUMER"),
        note: None,
        expiration: Some("2030-05-24T08:38:08.699-04:00".to_string()),
    }
}

fn quote_response() -> QuoteResponse {
    QuoteResponse {
        transfer_amount: Amount::new("500", "USD"),
        payee_receive_amount: Some(Amount::new("495", "USD")),
        payee_fsp_fee: Some(Amount::new("5", "USD")),
        payee_fsp_commission: None,
        expiration: "2030-05-24T08:38:08.699-04:00".to_string(),
        note: Some("lunch".to_string()),
        ilp_packet: None,
        condition: None,
    }
}

fn transfer_for(artifacts: &ilp::IlpResponse) -> TransferRequest {
    TransferRequest {
        transfer_id: "b51ec534-ee48-4575-b6a9-ead2955b8069".to_string(),
        payer_fsp: "payerfsp".to_string(),
        payee_fsp: "payeefsp".to_string(),
        amount: Amount::new("500", "USD"),
        ilp_packet: artifacts.ilp_packet.clone(),
        condition: artifacts.condition.clone(),
        expiration: "2030-05-24T08:38:08.699-04:00".to_string(),
    }
}

// ---------------------------------------------------------------------------
// ILP: quote → packet → transfer
// ---------------------------------------------------------------------------

#[test]
fn quote_to_transfer_round_trip_v4() {
    let engine = engine(IlpVersion::V4);
    let artifacts = engine
        .get_quote_response_ilp(&quote_request(), &quote_response())
        .expect("artifacts");

    assert!(!artifacts.fulfilment.is_empty());
    assert!(!artifacts.condition.is_empty());
    assert!(!artifacts.ilp_packet.is_empty());

    let tx = engine
        .get_transaction_object(&artifacts.ilp_packet)
        .expect("transaction object");
    let quote = tx.as_quote().expect("quote object");
    assert_eq!(quote.amount.currency, "USD");
    assert_eq!(quote.amount.amount, "500");
    assert_eq!(quote.note.as_deref(), Some("lunch"));

    let transfer = transfer_for(&artifacts);
    assert!(engine
        .validate_ilp_against_transfer_request(&transfer)
        .expect("decodable packet"));

    // The payee FSP recomputes the fulfilment when the transfer arrives.
    let fulfilment = engine.calculate_fulfil(&transfer.ilp_packet).expect("fulfil");
    assert_eq!(fulfilment, artifacts.fulfilment);
    assert!(engine.validate_fulfil(&fulfilment, &transfer.condition));
}

#[test]
fn quote_to_transfer_round_trip_v1() {
    let engine = engine(IlpVersion::V1);
    let artifacts = engine
        .get_quote_response_ilp(&quote_request(), &quote_response())
        .expect("artifacts");

    let transfer = transfer_for(&artifacts);
    assert!(engine
        .validate_ilp_against_transfer_request(&transfer)
        .expect("decodable packet"));
    assert!(engine.validate_fulfil(&artifacts.fulfilment, &artifacts.condition));

    let packet = engine.decode_ilp_packet(&artifacts.ilp_packet).expect("packet");
    assert_eq!(packet.amount(), 50_000);
    assert_eq!(packet.address(), "g.payeefsp.msisdn.27713803912");
}

#[test]
fn any_transfer_field_change_fails_cross_check() {
    for version in [IlpVersion::V1, IlpVersion::V4] {
        let engine = engine(version);
        let artifacts = engine
            .get_quote_response_ilp(&quote_request(), &quote_response())
            .expect("artifacts");

        let mutations: [(&str, fn(&mut TransferRequest)); 4] = [
            ("payerFsp", |t| t.payer_fsp = "mallory".to_string()),
            ("payeeFsp", |t| t.payee_fsp = "mallory".to_string()),
            ("amount", |t| t.amount.amount = "5000".to_string()),
            ("currency", |t| t.amount.currency = "EUR".to_string()),
        ];
        for (field, mutate) in mutations {
            let mut transfer = transfer_for(&artifacts);
            mutate(&mut transfer);
            let valid = engine
                .validate_ilp_against_transfer_request(&transfer)
                .expect("decodable packet");
            assert!(!valid, "{version}: changing {field} should fail the check");
        }
    }
}

#[test]
fn undecodable_transfer_packet_is_an_error() {
    let engine = engine(IlpVersion::V4);
    let artifacts = engine
        .get_quote_response_ilp(&quote_request(), &quote_response())
        .expect("artifacts");
    let mut transfer = transfer_for(&artifacts);
    transfer.ilp_packet = "AAAA".to_string();
    assert!(engine.validate_ilp_against_transfer_request(&transfer).is_err());
}

#[test]
fn wrong_fulfilment_is_false_not_error() {
    let engine = engine(IlpVersion::V4);
    let artifacts = engine
        .get_quote_response_ilp(&quote_request(), &quote_response())
        .expect("artifacts");

    let other = ilp::create(
        IlpVersion::V4,
        IlpOptions::new("another-secret", Arc::new(TracingLogger::default())),
    )
    .expect("engine");
    let foreign = other
        .get_quote_response_ilp(&quote_request(), &quote_response())
        .expect("artifacts");

    assert!(!engine.validate_fulfil(&foreign.fulfilment, &artifacts.condition));
    assert!(!engine.validate_fulfil("c2hvcnQ", &artifacts.condition));
}

#[test]
fn fx_quote_artifacts() {
    let terms = ConversionTerms {
        conversion_id: "581f68ef-b54f-416f-9161-ac34e889a84b".to_string(),
        determining_transfer_id: None,
        initiating_fsp: "payerfsp".to_string(),
        counter_party_fsp: "FDH_FX".to_string(),
        amount_type: "SEND".to_string(),
        source_amount: FxMoney {
            currency: "ZMW".to_string(),
            amount: Some("300".to_string()),
        },
        target_amount: FxMoney {
            currency: "MWK".to_string(),
            amount: Some("48000".to_string()),
        },
        expiration: "2030-05-24T08:38:08.699Z".to_string(),
        charges: None,
    };
    let request = FxQuoteRequest {
        conversion_request_id: "3bd4c0e3-5a3d-4b0a-b5b7-23c1a1a8e3b7".to_string(),
        conversion_terms: ConversionTerms {
            target_amount: FxMoney {
                currency: "MWK".to_string(),
                amount: None,
            },
            ..terms.clone()
        },
    };
    let response = FxQuoteResponse {
        conversion_terms: terms,
    };

    for version in [IlpVersion::V1, IlpVersion::V4] {
        let engine = engine(version);
        let artifacts = engine
            .get_fx_quote_response_ilp(&request, &response)
            .expect("fx artifacts");
        assert!(engine.validate_fulfil(&artifacts.fulfilment, &artifacts.condition));

        let packet = engine.decode_ilp_packet(&artifacts.ilp_packet).expect("packet");
        assert_eq!(packet.amount(), 0);

        let tx = engine
            .get_transaction_object(&artifacts.ilp_packet)
            .expect("transaction object");
        let fx = tx.as_fx().expect("fx object");
        assert_eq!(fx.conversion_terms.target_amount.amount.as_deref(), Some("48000"));
    }
}

#[test]
fn codecs_produce_incompatible_packets() {
    let v1 = engine(IlpVersion::V1);
    let v4 = engine(IlpVersion::V4);
    let tx = TransactionObject::from_quote(&quote_request(), &quote_response());

    let v1_packet = v1.get_response_ilp(&tx).expect("v1").ilp_packet;
    let v4_packet = v4.get_response_ilp(&tx).expect("v4").ilp_packet;
    assert!(matches!(
        v4.decode_ilp_packet(&v1_packet),
        Err(IlpError::UnexpectedPacketType { .. })
    ));
    assert!(matches!(
        v1.decode_ilp_packet(&v4_packet),
        Err(IlpError::UnexpectedPacketType { .. })
    ));
}

#[test]
fn v4_engine_reads_standard_prepare_packet() {
    // type 12 | amount 107 | "20301223010203000" | 32 x 0x11 | "g.mojaloop" | empty data
    let mut bytes = vec![0x0c, 0x45];
    bytes.extend_from_slice(&107u64.to_be_bytes());
    bytes.extend_from_slice(b"20301223010203000");
    bytes.extend_from_slice(&[0x11; 32]);
    bytes.push(10);
    bytes.extend_from_slice(b"g.mojaloop");
    bytes.push(0);
    let packet = base64url_encode(&bytes);

    let decoded = engine(IlpVersion::V4).decode_ilp_packet(&packet).unwrap();
    let ilp::IlpPacket::Prepare(prepare) = decoded else {
        panic!("expected a prepare packet");
    };
    assert_eq!(prepare.amount, 107);
    assert_eq!(prepare.expires_at.to_rfc3339(), "2030-12-23T01:02:03+00:00");
    assert_eq!(prepare.execution_condition, [0x11; 32]);
    assert_eq!(prepare.destination, "g.mojaloop");
    assert!(prepare.data.is_empty());
}

#[test]
fn factory_from_config_tag() {
    let engine = ilp::create_from_tag(
        "V1",
        IlpOptions::new("test", Arc::new(TracingLogger::default())),
    )
    .expect("engine");
    assert_eq!(engine.version(), IlpVersion::V1);
}

// ---------------------------------------------------------------------------
// JWS: sign → validate
// ---------------------------------------------------------------------------

fn validator() -> JwsValidator {
    let keys = ValidationKeys::from_pems([("payerfsp", PAYER_PUBLIC), ("payeefsp", OTHER_PUBLIC)])
        .expect("keys");
    JwsValidator::new(keys, Arc::new(TracingLogger::new("e2e")))
}

fn outbound_quote() -> JwsRequest {
    let body = serde_json::to_value(&quote_request()).expect("quote body");
    JwsRequest::new("post", "https://payeefsp.example:4000/quotes?trace=1")
        .header("Content-Type", "application/vnd.interoperability.quotes+json;version=1.0")
        .header("FSPIOP-Source", "payerfsp")
        .header("FSPIOP-Destination", "payeefsp")
        .header("Date", "Fri, 24 May 2030 12:38:08 GMT")
        .body(body)
}

#[test]
fn signed_quote_validates_on_the_other_side() {
    let signer = JwsSigner::new(PAYER_PRIVATE, Arc::new(TracingLogger::new("e2e"))).expect("signer");
    let request = outbound_quote();
    let headers = signer.sign(&request).expect("signed");
    let request = request.with_headers(headers);

    assert_eq!(request.headers.get("fspiop-uri"), Some("/quotes"));
    assert_eq!(request.headers.get("fspiop-http-method"), Some("POST"));

    // The receiver parses the body itself; key order must survive.
    let wire = serde_json::to_string(request.body.as_ref().expect("body")).expect("wire");
    let received: serde_json::Value = serde_json::from_str(&wire).expect("parse");
    let received = JwsRequest {
        body: Some(received),
        ..request
    };
    validator().validate_request(&received).expect("valid");
}

#[test]
fn signature_accessor_matches_header() {
    let signer = JwsSigner::new(PAYER_PRIVATE, Arc::new(TracingLogger::default())).expect("signer");
    let request = outbound_quote();
    let value = signer.signature(&request).expect("signature");
    let headers = signer.sign(&request).expect("signed");
    let request = request.with_headers(headers);

    // RS256 (PKCS#1 v1.5) is deterministic.
    assert_eq!(request.headers.get("fspiop-signature"), Some(value.as_str()));
    validator().validate_request(&request).expect("valid");
}

#[test]
fn tampering_after_signing_is_rejected() {
    let signer = JwsSigner::new(PAYER_PRIVATE, Arc::new(TracingLogger::default())).expect("signer");
    let request = outbound_quote();
    let signed = request.clone().with_headers(signer.sign(&request).expect("signed"));

    let mut body_changed = signed.clone();
    body_changed.body = Some(json!({"quoteId": "something else"}));
    assert!(matches!(
        validator().validate_request(&body_changed),
        Err(JwsError::InvalidSignature)
    ));

    let mut rerouted = signed.clone();
    rerouted.headers.insert("FSPIOP-Destination", "mallory");
    assert!(matches!(
        validator().validate_request(&rerouted),
        Err(JwsError::HeaderMismatch { field: "FSPIOP-Destination", .. })
    ));

    let mut redated = signed.clone();
    redated.headers.insert("Date", "Sat, 25 May 2030 12:38:08 GMT");
    assert!(matches!(
        validator().validate_request(&redated),
        Err(JwsError::HeaderMismatch { field: "Date", .. })
    ));

    for header in ["fspiop-source", "fspiop-uri", "fspiop-http-method", "fspiop-signature"] {
        let mut stripped = signed.clone();
        stripped.headers.remove(header);
        assert!(validator().validate_request(&stripped).is_err(), "{header}");
    }
}
