use std::collections::HashMap;
use std::time::Duration;

use chaintrace_serialization::VarUint32;

use crate::chain::{
    ACTIVE_NAME, ActionTrace, BlockState, Id, ONBLOCK_NAME, SYSTEM_NAME, SignedTransaction,
    TransactionStatus, TransactionTrace, error::ChainError,
};
use crate::trace::{
    AbiResolver, ActionTraceV0, AuthorizationTraceV0, BlockTraceV0, ExceptionContext,
    ExceptionHandler, TraceStore, TransactionTraceV0, process_data,
};

/// Captures transaction traces, action traces, and block info from the
/// engine's notification stream and appends assembled block traces to the
/// store. All entry points are synchronous and never propagate failures
/// back into the engine; failures go to the exception handler instead.
pub struct ChainExtractor<S: TraceStore, R: AbiResolver> {
    store: S,
    resolver: R,
    except_handler: ExceptionHandler,
    max_decode_time: Duration,
    cached_traces: HashMap<Id, (TransactionTrace, SignedTransaction)>,
    onblock_trace: Option<TransactionTrace>,
}

impl<S: TraceStore, R: AbiResolver> ChainExtractor<S, R> {
    pub fn new(
        store: S,
        resolver: R,
        except_handler: ExceptionHandler,
        max_decode_time: Duration,
    ) -> Self {
        Self {
            store,
            resolver,
            except_handler,
            max_decode_time,
            cached_traces: HashMap::new(),
            onblock_trace: None,
        }
    }

    /// The live decoding registry, for installing or replacing schemas.
    pub fn resolver_mut(&mut self) -> &mut R {
        &mut self.resolver
    }

    /// Connect to the engine's applied-transaction signal.
    pub fn signal_applied_transaction(
        &mut self,
        trace: &TransactionTrace,
        trx: &SignedTransaction,
    ) {
        self.on_applied_transaction(trace, trx);
    }

    /// Connect to the engine's accepted-block signal.
    pub fn signal_accepted_block(&mut self, block_state: &BlockState) {
        self.store_block_trace(block_state);
    }

    /// Connect to the engine's irreversible-block signal.
    pub fn signal_irreversible_block(&mut self, block_state: &BlockState) {
        self.store_lib(block_state);
    }

    fn is_onblock(trace: &TransactionTrace) -> bool {
        if trace.action_traces.len() != 1 {
            return false;
        }
        let act = &trace.action_traces[0].act;
        if act.account() != SYSTEM_NAME
            || act.name() != ONBLOCK_NAME
            || act.authorization().len() != 1
        {
            return false;
        }
        let auth = &act.authorization()[0];
        *auth.actor() == SYSTEM_NAME && *auth.permission() == ACTIVE_NAME
    }

    fn on_applied_transaction(&mut self, trace: &TransactionTrace, trx: &SignedTransaction) {
        let Some(receipt) = &trace.receipt else {
            return;
        };
        // Only executed transactions are kept; soft_fail included so that
        // onerror (and any inlines via onerror) are included.
        if receipt.status != TransactionStatus::Executed
            && receipt.status != TransactionStatus::SoftFail
        {
            return;
        }
        if Self::is_onblock(trace) {
            self.onblock_trace = Some(trace.clone());
        } else if let Some(failed) = &trace.failed_dtrx_trace {
            // Keyed by the failed sub-transaction's id, the one the block's
            // transaction list refers to.
            self.cached_traces
                .insert(failed.id, (trace.clone(), trx.clone()));
        } else {
            self.cached_traces
                .insert(trace.id, (trace.clone(), trx.clone()));
        }
    }

    fn store_block_trace(&mut self, block_state: &BlockState) {
        let result = self.try_store_block_trace(block_state);

        // Drained whether or not assembly succeeded, to bound memory and
        // prevent cross-block leakage.
        self.cached_traces.clear();
        self.onblock_trace = None;

        if let Err(error) = result {
            (self.except_handler)(ExceptionContext {
                operation: "append block trace",
                block_num: Some(block_state.block_num()),
                error,
            });
        }
    }

    fn try_store_block_trace(&mut self, block_state: &BlockState) -> Result<(), ChainError> {
        let mut bt = create_block_trace_v0(block_state);

        bt.transactions
            .reserve(block_state.block.transactions.len() + 1);
        if let Some(onblock) = self.onblock_trace.take() {
            bt.transactions.push(self.to_transaction_trace_v0(&onblock, None)?);
        }
        for receipt in &block_state.block.transactions {
            let id = receipt.trx().id();
            if let Some((trace, trx)) = self.cached_traces.remove(&id) {
                bt.transactions
                    .push(self.to_transaction_trace_v0(&trace, Some(&trx))?);
            }
        }

        spdlog::debug!(
            "assembled trace for block {} with {} transactions",
            bt.number,
            bt.transactions.len()
        );

        self.store.append(bt)
    }

    fn store_lib(&mut self, block_state: &BlockState) {
        if let Err(error) = self.store.append_lib(block_state.block_num()) {
            (self.except_handler)(ExceptionContext {
                operation: "append lib",
                block_num: Some(block_state.block_num()),
                error,
            });
        }
    }

    fn to_transaction_trace_v0(
        &self,
        trace: &TransactionTrace,
        trx: Option<&SignedTransaction>,
    ) -> Result<TransactionTraceV0, ChainError> {
        let receipt = trace.receipt.as_ref().ok_or_else(|| {
            ChainError::TransactionError(format!("cached trace {} has no receipt", trace.id))
        })?;

        let mut r = match &trace.failed_dtrx_trace {
            Some(failed) => TransactionTraceV0 {
                status: receipt.status,
                cpu_usage_us: 0,
                net_usage_words: VarUint32(0),
                // Report the failed sub-transaction id since that is the id
                // known to the submitter. Header, signatures and usage do
                // not apply to the synthetic wrapper.
                id: failed.id,
                signatures: vec![],
                trx_header: Default::default(),
                actions: vec![],
            },
            None => {
                let (signatures, trx_header) = match trx {
                    Some(signed) => (
                        signed.signatures().to_vec(),
                        signed.transaction().header,
                    ),
                    None => (vec![], Default::default()),
                };
                TransactionTraceV0 {
                    status: receipt.status,
                    cpu_usage_us: receipt.cpu_usage_us,
                    net_usage_words: receipt.net_usage_words,
                    id: trace.id,
                    signatures,
                    trx_header,
                    actions: vec![],
                }
            }
        };

        r.actions.reserve(trace.action_traces.len());
        for at in &trace.action_traces {
            // not including context-free actions at this time
            if !at.context_free {
                r.actions.push(self.to_action_trace_v0(at));
            }
        }
        Ok(r)
    }

    fn to_action_trace_v0(&self, at: &ActionTrace) -> ActionTraceV0 {
        ActionTraceV0 {
            global_sequence: at.receipt.as_ref().map(|r| r.global_sequence).unwrap_or(0),
            receiver: at.receiver,
            account: at.act.account(),
            action: at.act.name(),
            authorization: at
                .act
                .authorization()
                .iter()
                .map(|auth| AuthorizationTraceV0 {
                    account: *auth.actor(),
                    permission: *auth.permission(),
                })
                .collect(),
            data: process_data(&self.resolver, &at.act, self.max_decode_time),
        }
    }
}

/// Block trace with header fields copied and no transactions yet.
fn create_block_trace_v0(block_state: &BlockState) -> BlockTraceV0 {
    let header = block_state.block.header();
    BlockTraceV0 {
        id: *block_state.id(),
        number: block_state.block_num(),
        previous_id: header.previous,
        timestamp: header.timestamp,
        producer: header.producer,
        transaction_mroot: header.transaction_mroot,
        action_mroot: header.action_mroot,
        schedule_version: header.schedule_version,
        transactions: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use chaintrace_serialization::Write;
    use serde_json::json;

    use crate::abi::{
        AbiActionDefinition, AbiDefinition, AbiFieldDefinition, AbiStructDefinition,
    };
    use crate::chain::{
        Action, ActionReceipt, BlockHeader, Bytes, Digest, Name, PermissionLevel, SignedBlock,
        SignedBlockHeader, Transaction, TransactionHeader, TransactionReceipt,
        TransactionReceiptHeader, TransactionRef,
    };
    use crate::trace::AbiDataHandler;

    #[derive(Clone, Default)]
    struct RecordingStore {
        blocks: Rc<RefCell<Vec<BlockTraceV0>>>,
        lib: Rc<RefCell<Vec<u32>>>,
        fail_next_append: Rc<RefCell<bool>>,
    }

    impl TraceStore for RecordingStore {
        fn append(&self, trace: BlockTraceV0) -> Result<(), ChainError> {
            if self.fail_next_append.replace(false) {
                return Err(ChainError::StoreError("disk full".into()));
            }
            self.blocks.borrow_mut().push(trace);
            Ok(())
        }

        fn append_lib(&self, block_num: u32) -> Result<(), ChainError> {
            self.lib.borrow_mut().push(block_num);
            Ok(())
        }
    }

    struct Fixture {
        extractor: ChainExtractor<RecordingStore, AbiDataHandler>,
        store: RecordingStore,
        failures: Rc<RefCell<Vec<ExceptionContext>>>,
    }

    fn fixture() -> Fixture {
        let store = RecordingStore::default();
        let failures: Rc<RefCell<Vec<ExceptionContext>>> = Rc::default();
        let sink = failures.clone();
        let extractor = ChainExtractor::new(
            store.clone(),
            AbiDataHandler::new(),
            Box::new(move |ctx| sink.borrow_mut().push(ctx)),
            Duration::from_millis(15),
        );
        Fixture {
            extractor,
            store,
            failures,
        }
    }

    fn transfer_trx(memo: u8) -> SignedTransaction {
        let action = Action::new(
            Name::named("token"),
            Name::named("transfer"),
            vec![PermissionLevel::new(Name::named("alice"), ACTIVE_NAME)],
            vec![memo],
        );
        SignedTransaction::new(
            Transaction::new(TransactionHeader::default(), vec![], vec![action]),
            vec![],
            vec![],
        )
    }

    fn applied(signed: &SignedTransaction, status: TransactionStatus) -> TransactionTrace {
        let mut traces = Vec::new();
        for act in &signed.transaction().actions {
            traces.push(
                ActionTrace::new(act.clone(), act.account(), false).with_receipt(
                    ActionReceipt::new(act.account(), Digest::default(), 100, 1),
                ),
            );
        }
        TransactionTrace {
            id: signed.transaction().id().unwrap(),
            receipt: Some(TransactionReceiptHeader::new(status, 150, 12)),
            action_traces: traces,
            ..Default::default()
        }
    }

    fn onblock_trace() -> TransactionTrace {
        let act = Action::new(
            SYSTEM_NAME,
            ONBLOCK_NAME,
            vec![PermissionLevel::new(SYSTEM_NAME, ACTIVE_NAME)],
            vec![],
        );
        TransactionTrace {
            id: Id::for_block(0, 0xEE),
            receipt: Some(TransactionReceiptHeader::new(
                TransactionStatus::Executed,
                5,
                0,
            )),
            action_traces: vec![ActionTrace::new(act, SYSTEM_NAME, false)],
            ..Default::default()
        }
    }

    fn block_with(block_num: u32, refs: Vec<TransactionRef>) -> BlockState {
        let transactions = refs
            .into_iter()
            .map(|trx| {
                TransactionReceipt::new(
                    TransactionReceiptHeader::new(TransactionStatus::Executed, 150, 12),
                    trx,
                )
            })
            .collect();
        BlockState::new(SignedBlock {
            signed_block_header: SignedBlockHeader {
                header: BlockHeader {
                    previous: Id::for_block(block_num - 1, 0x11),
                    producer: Name::named("prod"),
                    ..Default::default()
                },
                ..Default::default()
            },
            transactions,
        })
        .unwrap()
    }

    fn id_ref(signed: &SignedTransaction) -> TransactionRef {
        TransactionRef::TransactionId(signed.transaction().id().unwrap())
    }

    #[test]
    fn cached_transactions_appear_in_block_order() {
        let mut fx = fixture();
        let t1 = transfer_trx(1);
        let t2 = transfer_trx(2);

        // applied out of block order
        fx.extractor
            .signal_applied_transaction(&applied(&t2, TransactionStatus::Executed), &t2);
        fx.extractor
            .signal_applied_transaction(&applied(&t1, TransactionStatus::Executed), &t1);

        let block = block_with(5, vec![id_ref(&t1), id_ref(&t2)]);
        fx.extractor.signal_accepted_block(&block);

        let blocks = fx.store.blocks.borrow();
        assert_eq!(blocks.len(), 1);
        let bt = &blocks[0];
        assert_eq!(bt.number, 5);
        assert_eq!(bt.transactions.len(), 2);
        assert_eq!(bt.transactions[0].id, t1.transaction().id().unwrap());
        assert_eq!(bt.transactions[1].id, t2.transaction().id().unwrap());
        assert!(fx.failures.borrow().is_empty());
    }

    #[test]
    fn onblock_trace_is_always_first() {
        let mut fx = fixture();
        let t1 = transfer_trx(1);
        fx.extractor
            .signal_applied_transaction(&applied(&t1, TransactionStatus::Executed), &t1);
        // onblock arrives after the user transaction
        fx.extractor
            .signal_applied_transaction(&onblock_trace(), &SignedTransaction::default());

        let block = block_with(2, vec![id_ref(&t1)]);
        fx.extractor.signal_accepted_block(&block);

        let blocks = fx.store.blocks.borrow();
        assert_eq!(blocks[0].transactions.len(), 2);
        assert_eq!(blocks[0].transactions[0].id, Id::for_block(0, 0xEE));
        assert_eq!(
            blocks[0].transactions[1].id,
            t1.transaction().id().unwrap()
        );
    }

    #[test]
    fn later_onblock_overwrites_earlier_one() {
        let mut fx = fixture();
        let first = onblock_trace();
        let mut second = onblock_trace();
        second.id = Id::for_block(0, 0xFF);

        fx.extractor
            .signal_applied_transaction(&first, &SignedTransaction::default());
        fx.extractor
            .signal_applied_transaction(&second, &SignedTransaction::default());

        fx.extractor.signal_accepted_block(&block_with(2, vec![]));

        let blocks = fx.store.blocks.borrow();
        assert_eq!(blocks[0].transactions.len(), 1);
        assert_eq!(blocks[0].transactions[0].id, Id::for_block(0, 0xFF));
    }

    #[test]
    fn cache_is_drained_after_a_block() {
        let mut fx = fixture();
        let t1 = transfer_trx(1);
        fx.extractor
            .signal_applied_transaction(&applied(&t1, TransactionStatus::Executed), &t1);
        fx.extractor
            .signal_applied_transaction(&onblock_trace(), &SignedTransaction::default());

        fx.extractor
            .signal_accepted_block(&block_with(2, vec![id_ref(&t1)]));
        // same references again, but nothing was re-applied
        fx.extractor
            .signal_accepted_block(&block_with(3, vec![id_ref(&t1)]));

        let blocks = fx.store.blocks.borrow();
        assert_eq!(blocks[0].transactions.len(), 2);
        assert_eq!(blocks[1].transactions.len(), 0);
    }

    #[test]
    fn failed_outcomes_are_never_cached() {
        let mut fx = fixture();
        let t1 = transfer_trx(1);
        let t2 = transfer_trx(2);
        fx.extractor
            .signal_applied_transaction(&applied(&t1, TransactionStatus::HardFail), &t1);
        fx.extractor
            .signal_applied_transaction(&applied(&t2, TransactionStatus::Expired), &t2);

        fx.extractor
            .signal_accepted_block(&block_with(2, vec![id_ref(&t1), id_ref(&t2)]));

        assert_eq!(fx.store.blocks.borrow()[0].transactions.len(), 0);
    }

    #[test]
    fn soft_failed_transactions_are_cached() {
        let mut fx = fixture();
        let t1 = transfer_trx(1);
        fx.extractor
            .signal_applied_transaction(&applied(&t1, TransactionStatus::SoftFail), &t1);

        fx.extractor
            .signal_accepted_block(&block_with(2, vec![id_ref(&t1)]));

        let blocks = fx.store.blocks.borrow();
        assert_eq!(blocks[0].transactions.len(), 1);
        assert_eq!(
            blocks[0].transactions[0].status,
            TransactionStatus::SoftFail
        );
    }

    #[test]
    fn failed_deferred_wrapper_reports_the_nested_id() {
        let mut fx = fixture();
        let wrapper_trx = transfer_trx(1);
        let nested_id = Id::for_block(0, 0x77);

        let mut wrapper = applied(&wrapper_trx, TransactionStatus::SoftFail);
        wrapper.failed_dtrx_trace = Some(Box::new(TransactionTrace {
            id: nested_id,
            ..Default::default()
        }));
        fx.extractor
            .signal_applied_transaction(&wrapper, &wrapper_trx);

        // the block refers to the nested id, not the wrapper's own id
        fx.extractor.signal_accepted_block(&block_with(
            2,
            vec![TransactionRef::TransactionId(nested_id)],
        ));

        let blocks = fx.store.blocks.borrow();
        assert_eq!(blocks[0].transactions.len(), 1);
        let tt = &blocks[0].transactions[0];
        assert_eq!(tt.id, nested_id);
        assert!(tt.signatures.is_empty());
        assert_eq!(tt.trx_header, TransactionHeader::default());
        assert_eq!(tt.cpu_usage_us, 0);
    }

    #[test]
    fn packed_transaction_references_resolve_to_cache_hits() {
        let mut fx = fixture();
        let t1 = transfer_trx(1);
        fx.extractor
            .signal_applied_transaction(&applied(&t1, TransactionStatus::Executed), &t1);

        let packed = crate::chain::PackedTransaction::new(
            vec![],
            crate::chain::TransactionCompression::None,
            Bytes::default(),
            t1.transaction().pack().unwrap().into(),
        )
        .unwrap();
        fx.extractor
            .signal_accepted_block(&block_with(2, vec![TransactionRef::Packed(packed)]));

        let blocks = fx.store.blocks.borrow();
        assert_eq!(blocks[0].transactions.len(), 1);
        assert_eq!(
            blocks[0].transactions[0].id,
            t1.transaction().id().unwrap()
        );
    }

    #[test]
    fn context_free_actions_are_stripped() {
        let mut fx = fixture();
        let t1 = transfer_trx(1);
        let mut trace = applied(&t1, TransactionStatus::Executed);
        trace.action_traces.push(ActionTrace::new(
            Action::new(Name::named("cfacct"), Name::named("cfa"), vec![], vec![]),
            Name::named("cfacct"),
            true,
        ));
        fx.extractor.signal_applied_transaction(&trace, &t1);

        fx.extractor
            .signal_accepted_block(&block_with(2, vec![id_ref(&t1)]));

        let blocks = fx.store.blocks.borrow();
        assert_eq!(blocks[0].transactions[0].actions.len(), 1);
        assert_eq!(
            blocks[0].transactions[0].actions[0].action,
            Name::named("transfer")
        );
    }

    #[test]
    fn undecoded_data_round_trips_as_raw_hex() {
        let mut fx = fixture();
        let t1 = transfer_trx(0xAB);
        fx.extractor
            .signal_applied_transaction(&applied(&t1, TransactionStatus::Executed), &t1);
        fx.extractor
            .signal_accepted_block(&block_with(2, vec![id_ref(&t1)]));

        let blocks = fx.store.blocks.borrow();
        assert_eq!(blocks[0].transactions[0].actions[0].data, json!("ab"));
    }

    #[test]
    fn assembly_decodes_with_the_schema_current_at_assembly_time() {
        let mut fx = fixture();
        let t1 = transfer_trx(0x05);
        fx.extractor
            .signal_applied_transaction(&applied(&t1, TransactionStatus::Executed), &t1);

        // schema registered after the transaction was applied
        fx.extractor.resolver_mut().add_abi(
            Name::named("token"),
            AbiDefinition {
                version: String::new(),
                types: vec![],
                structs: vec![AbiStructDefinition {
                    name: "transfer".to_string(),
                    base: "".to_string(),
                    fields: vec![AbiFieldDefinition {
                        name: "memo".to_string(),
                        type_name: "uint8".to_string(),
                    }],
                }],
                actions: vec![AbiActionDefinition {
                    name: Name::named("transfer"),
                    type_name: "transfer".to_string(),
                    ricardian_contract: "".to_string(),
                }],
            },
        );

        fx.extractor
            .signal_accepted_block(&block_with(2, vec![id_ref(&t1)]));

        let blocks = fx.store.blocks.borrow();
        assert_eq!(
            blocks[0].transactions[0].actions[0].data,
            json!({ "memo": 5 })
        );
    }

    #[test]
    fn store_failure_reaches_the_handler_exactly_once() {
        let mut fx = fixture();
        let t1 = transfer_trx(1);
        fx.extractor
            .signal_applied_transaction(&applied(&t1, TransactionStatus::Executed), &t1);
        *fx.store.fail_next_append.borrow_mut() = true;

        fx.extractor
            .signal_accepted_block(&block_with(2, vec![id_ref(&t1)]));

        let failures = fx.failures.borrow();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].operation, "append block trace");
        assert_eq!(failures[0].block_num, Some(2));
        drop(failures);

        // next block still processes
        let t2 = transfer_trx(2);
        fx.extractor
            .signal_applied_transaction(&applied(&t2, TransactionStatus::Executed), &t2);
        fx.extractor
            .signal_accepted_block(&block_with(3, vec![id_ref(&t2)]));
        assert_eq!(fx.store.blocks.borrow().len(), 1);
        assert_eq!(fx.failures.borrow().len(), 1);
    }

    #[test]
    fn irreversible_blocks_forward_to_the_store() {
        let mut fx = fixture();
        fx.extractor.signal_accepted_block(&block_with(9, vec![]));
        fx.extractor
            .signal_irreversible_block(&block_with(9, vec![]));
        assert_eq!(*fx.store.lib.borrow(), vec![9]);
    }

    #[test]
    fn end_to_end_single_transaction_block() {
        let mut fx = fixture();
        let signed = SignedTransaction::new(
            Transaction::new(
                TransactionHeader::default(),
                vec![],
                vec![Action::new(
                    Name::named("token"),
                    Name::named("transfer"),
                    vec![],
                    vec![],
                )],
            ),
            vec![],
            vec![],
        );
        fx.extractor
            .signal_applied_transaction(&applied(&signed, TransactionStatus::Executed), &signed);
        fx.extractor
            .signal_accepted_block(&block_with(2, vec![id_ref(&signed)]));

        let blocks = fx.store.blocks.borrow();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].transactions.len(), 1);
        let tt = &blocks[0].transactions[0];
        assert_eq!(tt.id, signed.transaction().id().unwrap());
        assert_eq!(tt.status, TransactionStatus::Executed);
        assert_eq!(tt.actions.len(), 1);
        assert!(tt.actions[0].authorization.is_empty());
        assert!(fx.failures.borrow().is_empty());
    }
}
