//! # Integration Test Flows
//!
//! Full deal lifecycles driven through the in-memory chain host:
//! deployment, funding on both asset paths, guarantor resolution, and the
//! adversarial rejections around them.

#[cfg(test)]
mod tests {
    use escrow_engine::{
        derive_wallet_address, Asset, ChainError, Coins, DealConfig, DealState, InMemoryChain,
        InboundMessage, MsgAddress, OutboundMessage, RoyaltyRate, SendMode, TransferNotification,
        WalletCode, OP_APPROVE, OP_BUYER_TRANSFER, OP_CANCEL, OP_TOP_UP,
        SETTLEMENT_FEE_PER_MESSAGE,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const DEAL_AMOUNT: Coins = 1_000_000_000;
    const GAS_RESERVE: Coins = 200_000_000;

    fn addr(tag: u8) -> MsgAddress {
        MsgAddress::new(0, [tag; 32])
    }

    fn random_addr() -> MsgAddress {
        MsgAddress::new(0, rand::random::<[u8; 32]>())
    }

    fn seller() -> MsgAddress {
        addr(0x01)
    }

    fn guarantor() -> MsgAddress {
        addr(0x02)
    }

    fn minter() -> MsgAddress {
        addr(0x03)
    }

    fn buyer() -> MsgAddress {
        addr(0x09)
    }

    fn own_address() -> MsgAddress {
        addr(0xEE)
    }

    fn wallet_code() -> WalletCode {
        WalletCode::new(vec![0xF0, 0x0D])
    }

    fn native_config(royalty_raw: u32) -> DealConfig {
        DealConfig {
            context_id: 0xC0DE,
            seller: seller(),
            guarantor: guarantor(),
            deal_amount: DEAL_AMOUNT,
            asset: Asset::Native,
            royalty: RoyaltyRate::from_raw(royalty_raw),
        }
    }

    fn token_config(royalty_raw: u32) -> DealConfig {
        DealConfig {
            asset: Asset::Token {
                minter: minter(),
                wallet_code: wallet_code(),
            },
            ..native_config(royalty_raw)
        }
    }

    fn deploy_native(royalty_raw: u32) -> InMemoryChain {
        InMemoryChain::deploy(native_config(royalty_raw), own_address(), GAS_RESERVE).unwrap()
    }

    fn deploy_token(royalty_raw: u32) -> InMemoryChain {
        InMemoryChain::deploy(token_config(royalty_raw), own_address(), GAS_RESERVE).unwrap()
    }

    fn deal_wallet() -> MsgAddress {
        derive_wallet_address(&own_address(), &minter(), &wallet_code())
    }

    fn fund_native(chain: &InMemoryChain) {
        chain
            .send(InboundMessage::plain(buyer(), DEAL_AMOUNT))
            .unwrap();
    }

    fn fund_token(chain: &InMemoryChain) {
        let note = TransferNotification {
            query_id: 1,
            amount: DEAL_AMOUNT,
            origin: buyer(),
        };
        chain
            .send(InboundMessage::transfer_notification(deal_wallet(), 10_000_000, &note).unwrap())
            .unwrap();
    }

    fn exit_code(err: ChainError) -> u32 {
        err.exit_code().expect("expected an escrow exit code")
    }

    // =============================================================================
    // DEPLOYMENT & QUERIES
    // =============================================================================

    /// Freshly deployed deals read back their configuration unchanged.
    #[test]
    fn test_deploy_round_trips_configuration() {
        let chain = deploy_token(1_000);
        assert_eq!(chain.deal_state().unwrap(), DealState::Init);

        let record = chain.deal_record().unwrap();
        assert_eq!(record.context_id, 0xC0DE);
        assert_eq!(record.seller, seller());
        assert_eq!(
            record.seller.to_string(),
            format!("0:{}", hex::encode([0x01u8; 32]))
        );
        assert_eq!(record.guarantor, guarantor());
        assert_eq!(record.deal_amount, DEAL_AMOUNT);
        assert_eq!(record.buyer, None);
        match record.asset {
            Asset::Token {
                minter: m,
                wallet_code: code,
            } => {
                assert_eq!(m, minter());
                assert_eq!(code, wallet_code());
            }
            Asset::Native => panic!("expected token asset"),
        }
    }

    /// The royalty query matches the documented 1% of 1e9.
    #[test]
    fn test_royalty_query() {
        let chain = deploy_native(1_000);
        assert_eq!(chain.royalty_amount().unwrap(), 10_000_000);
    }

    /// A royalty configured above the cap reports the capped amount.
    #[test]
    fn test_royalty_query_caps_at_ninety_percent() {
        // 101% configured
        let chain = deploy_native(101_000);
        assert_eq!(chain.royalty_amount().unwrap(), 900_000_000);
    }

    // =============================================================================
    // NATIVE LIFECYCLE
    // =============================================================================

    /// Deploy, fund exactly, approve: seller gets 99%, guarantor gets the
    /// royalty plus everything left, account is gone.
    #[test]
    fn test_native_approve_lifecycle() {
        let chain = deploy_native(1_000);
        fund_native(&chain);
        assert_eq!(chain.deal_state().unwrap(), DealState::Funded);
        assert_eq!(chain.deal_record().unwrap().buyer, Some(buyer()));

        let outcome = chain
            .send(InboundMessage::tagged(guarantor(), 0, OP_APPROVE))
            .unwrap();
        assert!(outcome.destroyed);
        assert_eq!(outcome.outbound.len(), 2);

        match &outcome.outbound[0] {
            OutboundMessage::NativeTransfer { to, value, mode } => {
                assert_eq!(*to, seller());
                assert_eq!(*value, 990_000_000);
                assert!(mode.contains(SendMode::PAY_FEES_SEPARATELY));
            }
            other => panic!("expected native transfer, got {other:?}"),
        }
        match &outcome.outbound[1] {
            OutboundMessage::NativeTransfer { to, value, mode } => {
                assert_eq!(*to, guarantor());
                // Royalty rides the remainder-carrying destroy message, so
                // the guarantor receives at least this much.
                assert_eq!(*value, 10_000_000);
                assert!(mode.destroys_sender());
            }
            other => panic!("expected native transfer, got {other:?}"),
        }

        assert!(chain.is_destroyed());
        assert_eq!(chain.balance(), 0);
    }

    /// Cancel refunds the buyer in one full-balance transfer, no royalty.
    #[test]
    fn test_native_cancel_lifecycle() {
        let chain = deploy_native(1_000);
        fund_native(&chain);

        let outcome = chain
            .send(InboundMessage::tagged(guarantor(), 0, OP_CANCEL))
            .unwrap();
        assert!(outcome.destroyed);
        assert_eq!(outcome.outbound.len(), 1);
        match &outcome.outbound[0] {
            OutboundMessage::NativeTransfer { to, mode, .. } => {
                assert_eq!(*to, buyer());
                assert!(mode.contains(SendMode::CARRY_ALL_BALANCE));
                assert!(mode.destroys_sender());
            }
            other => panic!("expected native transfer, got {other:?}"),
        }
        assert!(chain.is_destroyed());
    }

    /// The tagged funding marker behaves exactly like a plain transfer.
    #[test]
    fn test_buyer_transfer_op_funds() {
        let chain = deploy_native(1_000);
        chain
            .send(InboundMessage::tagged(buyer(), DEAL_AMOUNT, OP_BUYER_TRANSFER))
            .unwrap();
        assert_eq!(chain.deal_state().unwrap(), DealState::Funded);
    }

    /// Surplus native funding is attributed to gas; deficiency aborts.
    #[test]
    fn test_native_funding_amount_policy() {
        let chain = deploy_native(1_000);
        let err = chain
            .send(InboundMessage::plain(buyer(), DEAL_AMOUNT - 1))
            .unwrap_err();
        assert_eq!(exit_code(err), 401);
        assert_eq!(chain.deal_state().unwrap(), DealState::Init);

        chain
            .send(InboundMessage::plain(buyer(), DEAL_AMOUNT + 12_345))
            .unwrap();
        assert_eq!(chain.deal_state().unwrap(), DealState::Funded);
    }

    /// A second funding attempt no longer applies to the deal.
    #[test]
    fn test_double_funding_rejected() {
        let chain = deploy_native(1_000);
        fund_native(&chain);
        let err = chain
            .send(InboundMessage::plain(random_addr(), DEAL_AMOUNT))
            .unwrap_err();
        assert_eq!(exit_code(err), 400);
        assert_eq!(chain.deal_record().unwrap().buyer, Some(buyer()));
    }

    // =============================================================================
    // TOKEN LIFECYCLE
    // =============================================================================

    /// Token deal funds via a wallet notification and settles through two
    /// token-transfer instructions to the derived wallet.
    #[test]
    fn test_token_approve_lifecycle() {
        let chain = deploy_token(1_000);
        fund_token(&chain);
        assert_eq!(chain.deal_state().unwrap(), DealState::Funded);
        // Buyer is the origin behind the wallet, not the wallet itself.
        assert_eq!(chain.deal_record().unwrap().buyer, Some(buyer()));

        let outcome = chain
            .send(InboundMessage::tagged(guarantor(), 0, OP_APPROVE))
            .unwrap();
        assert!(outcome.destroyed);
        assert_eq!(outcome.outbound.len(), 2);

        match (&outcome.outbound[0], &outcome.outbound[1]) {
            (
                OutboundMessage::TokenTransfer {
                    wallet: w0,
                    amount: a0,
                    destination: d0,
                    ..
                },
                OutboundMessage::TokenTransfer {
                    wallet: w1,
                    amount: a1,
                    destination: d1,
                    mode,
                    ..
                },
            ) => {
                assert_eq!(*w0, deal_wallet());
                assert_eq!(*w1, deal_wallet());
                assert_eq!(*a0, 990_000_000);
                assert_eq!(*d0, seller());
                assert_eq!(*a1, 10_000_000);
                assert_eq!(*d1, guarantor());
                assert!(mode.destroys_sender());
            }
            other => panic!("unexpected settlement shape {other:?}"),
        }
        assert!(chain.is_destroyed());
    }

    /// Token cancel sends the full deal amount back to the buyer.
    #[test]
    fn test_token_cancel_lifecycle() {
        let chain = deploy_token(1_000);
        fund_token(&chain);

        let outcome = chain
            .send(InboundMessage::tagged(guarantor(), 0, OP_CANCEL))
            .unwrap();
        assert_eq!(outcome.outbound.len(), 1);
        match &outcome.outbound[0] {
            OutboundMessage::TokenTransfer {
                wallet,
                amount,
                destination,
                mode,
                ..
            } => {
                assert_eq!(*wallet, deal_wallet());
                assert_eq!(*amount, DEAL_AMOUNT);
                assert_eq!(*destination, buyer());
                assert!(mode.destroys_sender());
            }
            other => panic!("expected token transfer, got {other:?}"),
        }
        assert!(chain.is_destroyed());
    }

    /// Native value sent to a token-configured deal exits with 400.
    #[test]
    fn test_native_value_to_token_deal_rejected() {
        let chain = deploy_token(1_000);
        let err = chain
            .send(InboundMessage::plain(buyer(), DEAL_AMOUNT))
            .unwrap_err();
        assert_eq!(exit_code(err), 400);
        assert_eq!(chain.deal_state().unwrap(), DealState::Init);
    }

    /// A notification from anything but the derived wallet is spoofing.
    #[test]
    fn test_spoofed_notification_rejected() {
        let chain = deploy_token(1_000);
        let note = TransferNotification {
            query_id: 7,
            amount: DEAL_AMOUNT,
            origin: buyer(),
        };
        let spoofed =
            InboundMessage::transfer_notification(random_addr(), 10_000_000, &note).unwrap();
        let err = chain.send(spoofed).unwrap_err();
        assert_eq!(exit_code(err), 402);
        assert_eq!(chain.deal_state().unwrap(), DealState::Init);
    }

    /// The token path accepts neither under- nor over-payment.
    #[test]
    fn test_token_funding_strict_equality() {
        let chain = deploy_token(1_000);
        for amount in [DEAL_AMOUNT - 1, DEAL_AMOUNT + 1] {
            let note = TransferNotification {
                query_id: 7,
                amount,
                origin: buyer(),
            };
            let msg =
                InboundMessage::transfer_notification(deal_wallet(), 10_000_000, &note).unwrap();
            let err = chain.send(msg).unwrap_err();
            assert_eq!(exit_code(err), 401);
        }
        assert_eq!(chain.deal_state().unwrap(), DealState::Init);
    }

    // =============================================================================
    // GUARDS & RECOVERY
    // =============================================================================

    /// Resolution is guarantor-only and funded-only, from both directions.
    #[test]
    fn test_resolution_authorization_matrix() {
        let chain = deploy_native(1_000);
        // Unfunded: even the guarantor is turned away.
        for op in [OP_APPROVE, OP_CANCEL] {
            let err = chain
                .send(InboundMessage::tagged(guarantor(), 0, op))
                .unwrap_err();
            assert_eq!(exit_code(err), 403);
        }
        fund_native(&chain);
        // Funded: strangers, the seller, and the buyer are all turned away.
        for who in [seller(), buyer(), random_addr()] {
            for op in [OP_APPROVE, OP_CANCEL] {
                let err = chain.send(InboundMessage::tagged(who, 0, op)).unwrap_err();
                assert_eq!(exit_code(err), 403);
            }
        }
        assert_eq!(chain.deal_state().unwrap(), DealState::Funded);
    }

    /// Fee starvation aborts recoverably; top-up plus the identical retry
    /// settles the deal.
    #[test]
    fn test_fee_starvation_then_top_up_retry() {
        // No gas reserve at all: balance is exactly the reserved deal funds.
        let chain = InMemoryChain::deploy(native_config(1_000), own_address(), 0).unwrap();
        fund_native(&chain);

        let approve = InboundMessage::tagged(guarantor(), 0, OP_APPROVE);
        let err = chain.send(approve.clone()).unwrap_err();
        assert_eq!(exit_code(err), 404);
        assert_eq!(chain.deal_state().unwrap(), DealState::Funded);
        assert!(chain.sent_messages().is_empty());

        // Anyone may top up.
        chain
            .send(InboundMessage::tagged(
                random_addr(),
                2 * SETTLEMENT_FEE_PER_MESSAGE,
                OP_TOP_UP,
            ))
            .unwrap();

        let outcome = chain.send(approve).unwrap();
        assert!(outcome.destroyed);
        assert_eq!(outcome.outbound.len(), 2);
    }

    /// An unrecognized op is fatal to the message, not to the deal.
    #[test]
    fn test_unknown_operation_leaves_deal_intact() {
        let chain = deploy_native(1_000);
        fund_native(&chain);
        let err = chain
            .send(InboundMessage::tagged(buyer(), 0, 0x1234_5678))
            .unwrap_err();
        assert_eq!(exit_code(err), 0xffff);
        assert_eq!(chain.deal_state().unwrap(), DealState::Funded);

        // The deal still settles afterwards.
        chain
            .send(InboundMessage::tagged(guarantor(), 0, OP_APPROVE))
            .unwrap();
        assert!(chain.is_destroyed());
    }

    /// Wallet-code replacement: seller-only, INIT-only, single-field.
    #[test]
    fn test_change_wallet_code_flow() {
        let chain = deploy_token(1_000);
        let new_code = WalletCode::new(vec![0xBE, 0xEF]);

        let err = chain
            .send(InboundMessage::change_wallet_code(guarantor(), 0, &new_code).unwrap())
            .unwrap_err();
        assert_eq!(exit_code(err), 403);

        let before = chain.deal_record().unwrap();
        chain
            .send(InboundMessage::change_wallet_code(seller(), 0, &new_code).unwrap())
            .unwrap();
        let after = chain.deal_record().unwrap();
        assert_eq!(after.state, before.state);
        assert_eq!(after.seller, before.seller);
        assert_eq!(after.deal_amount, before.deal_amount);
        match after.asset {
            Asset::Token { wallet_code, .. } => {
                assert_eq!(wallet_code, new_code);
            }
            Asset::Native => panic!("asset kind changed"),
        }

        // Funding now expects the wallet derived from the new template.
        let note = TransferNotification {
            query_id: 3,
            amount: DEAL_AMOUNT,
            origin: buyer(),
        };
        let new_wallet = derive_wallet_address(&own_address(), &minter(), &new_code);
        chain
            .send(InboundMessage::transfer_notification(new_wallet, 10_000_000, &note).unwrap())
            .unwrap();

        let err = chain
            .send(InboundMessage::change_wallet_code(seller(), 0, &wallet_code()).unwrap())
            .unwrap_err();
        assert_eq!(exit_code(err), 400);
    }

    /// Once destroyed, the account answers nothing.
    #[test]
    fn test_destroyed_account_is_gone() {
        let chain = deploy_native(1_000);
        fund_native(&chain);
        chain
            .send(InboundMessage::tagged(guarantor(), 0, OP_CANCEL))
            .unwrap();

        assert!(matches!(
            chain.send(InboundMessage::plain(buyer(), 1)),
            Err(ChainError::AccountDestroyed)
        ));
        assert!(matches!(
            chain.deal_record(),
            Err(ChainError::AccountDestroyed)
        ));
    }
}
