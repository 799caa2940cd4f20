mod protocol {
    use itertools::izip;
    use rand::thread_rng;
    use rand::{Rng, SeedableRng};
    use rep3_core::field::PrimeField;
    use rep3_core::protocols::rep3::{
        self, arithmetic, Rep3FieldShare, Rep3State,
    };
    use rep3_core::{RngType, SEED_SIZE};
    use rep3_net::local::LocalNetwork;
    use rep3_net::Network;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    fn f23() -> PrimeField {
        PrimeField::new(23).unwrap()
    }

    fn party_seed(id: usize) -> [u8; SEED_SIZE] {
        [id as u8 + 1; SEED_SIZE]
    }

    fn run_sum(field: PrimeField, inputs: [u64; 3]) -> [u64; 3] {
        let nets = LocalNetwork::new_3_parties();
        let (tx1, rx1) = mpsc::channel();
        let (tx2, rx2) = mpsc::channel();
        let (tx3, rx3) = mpsc::channel();
        for (tx, net, secret) in izip!([tx1, tx2, tx3], nets, inputs) {
            thread::spawn(move || {
                let mut state = Rep3State::new(&net, field).unwrap();
                tx.send(arithmetic::sum(secret, &net, &mut state).unwrap())
                    .unwrap();
            });
        }
        [rx1.recv().unwrap(), rx2.recv().unwrap(), rx3.recv().unwrap()]
    }

    fn run_product(field: PrimeField, inputs: [u64; 3]) -> [u64; 3] {
        let nets = LocalNetwork::new_3_parties();
        let (tx1, rx1) = mpsc::channel();
        let (tx2, rx2) = mpsc::channel();
        let (tx3, rx3) = mpsc::channel();
        for (tx, net, secret) in izip!([tx1, tx2, tx3], nets, inputs) {
            thread::spawn(move || {
                let mut state = Rep3State::new(&net, field).unwrap();
                tx.send(arithmetic::product(secret, &net, &mut state).unwrap())
                    .unwrap();
            });
        }
        [rx1.recv().unwrap(), rx2.recv().unwrap(), rx3.recv().unwrap()]
    }

    #[test]
    fn sum_reconstructs_identically_at_all_parties() {
        let field = PrimeField::new(1000003).unwrap();
        let mut rng = thread_rng();
        for _ in 0..10 {
            let x = field.random_element(&mut rng);
            let y = field.random_element(&mut rng);
            let z = field.random_element(&mut rng);
            let should_result = field.add(x, field.add(y, z));
            let results = run_sum(field, [x, y, z]);
            assert_eq!(results, [should_result; 3]);
        }
    }

    #[test]
    fn sum_reference_vectors() {
        assert_eq!(run_sum(f23(), [5, 7, 11]), [0; 3]);
        assert_eq!(run_sum(f23(), [20, 20, 20]), [14; 3]);
    }

    #[test]
    fn product_reconstructs_identically_at_all_parties() {
        let field = PrimeField::new(1000003).unwrap();
        let mut rng = thread_rng();
        for _ in 0..10 {
            let x = field.random_element(&mut rng);
            let y = field.random_element(&mut rng);
            let should_result = field.mul(x, y);
            let results = run_product(field, [x, y, 0]);
            assert_eq!(results, [should_result; 3]);
        }
    }

    #[test]
    fn product_reference_vectors() {
        assert_eq!(run_product(f23(), [5, 7, 0]), [12; 3]);
        assert_eq!(run_product(f23(), [20, 20, 0]), [9; 3]);
    }

    #[test]
    fn product_ignores_the_helper_party_input() {
        // party 2 has no operand in a multiplication; whatever it passes
        // must not influence the result
        assert_eq!(run_product(f23(), [5, 7, 13]), [12; 3]);
    }

    #[test]
    fn additive_shares_resum_to_the_secret() {
        let field = f23();
        let mut rng = thread_rng();
        for _ in 0..100 {
            let secret = field.random_element(&mut rng);
            let [s0, s1, s2] = rep3::additive_shares(secret, &field, &mut rng);
            assert!(s0 < 23 && s1 < 23 && s2 < 23);
            assert_eq!(field.add(s0, field.add(s1, s2)), secret);
        }
    }

    #[test]
    fn fixed_seeds_reproduce_share_triples() {
        let field = f23();
        let mut rng_a = RngType::from_seed([42; SEED_SIZE]);
        let mut rng_b = RngType::from_seed([42; SEED_SIZE]);
        for secret in 0..23 {
            assert_eq!(
                rep3::additive_shares(secret, &field, &mut rng_a),
                rep3::additive_shares(secret, &field, &mut rng_b)
            );
        }
    }

    #[test]
    fn dealer_shares_combine_to_the_secret() {
        let field = f23();
        let mut rng = thread_rng();
        for _ in 0..100 {
            let secret = field.random_element(&mut rng);
            let [share0, share1, share2] = rep3::share_field_element(secret, &field, &mut rng);
            assert_eq!(
                rep3::combine_field_element(share0, share1, share2, &field),
                secret
            );
        }
    }

    #[test]
    fn share_distribution_follows_the_routing_table() {
        let field = f23();
        let inputs = [5u64, 7, 11];
        let nets = LocalNetwork::new_3_parties();
        let (tx1, rx1) = mpsc::channel();
        let (tx2, rx2) = mpsc::channel();
        let (tx3, rx3) = mpsc::channel();
        for (tx, net, secret) in izip!([tx1, tx2, tx3], nets, inputs) {
            thread::spawn(move || {
                let id = net.id();
                let mut state = Rep3State::from_seed(&net, field, party_seed(id)).unwrap();
                tx.send(arithmetic::share_secret(secret, &net, &mut state).unwrap())
                    .unwrap();
            });
        }
        let held = [rx1.recv().unwrap(), rx2.recv().unwrap(), rx3.recv().unwrap()];

        // recompute each owner's triple from its (deterministic) seed
        let mut triples = [[0u64; 3]; 3];
        for owner in 0..3 {
            let mut rng = RngType::from_seed(party_seed(owner));
            triples[owner] = rep3::additive_shares(inputs[owner], &field, &mut rng);
        }

        // party k must hold exactly (s_{k+1}, s_{k+2}) of every secret, so
        // every party sees two of the three shares and adjacent pairs overlap
        for owner in 0..3 {
            for party in 0..3 {
                let expected = Rep3FieldShare::new(
                    triples[owner][(party + 1) % 3],
                    triples[owner][(party + 2) % 3],
                );
                assert_eq!(held[party][owner], expected);
            }
            let reconstructed = rep3::combine_field_element(
                held[0][owner],
                held[1][owner],
                held[2][owner],
                &field,
            );
            assert_eq!(reconstructed, inputs[owner]);
        }
    }

    #[test]
    fn partial_products_cover_all_cross_terms() {
        let field = f23();
        let mut rng = thread_rng();
        for _ in 0..100 {
            let x = field.random_element(&mut rng);
            let y = field.random_element(&mut rng);
            let x_shares = rep3::share_field_element(x, &field, &mut rng);
            let y_shares = rep3::share_field_element(y, &field, &mut rng);
            let mut total = 0;
            for (xs, ys) in izip!(x_shares, y_shares) {
                total = field.add(total, arithmetic::partial_product(xs, ys, &field));
            }
            assert_eq!(total, field.mul(x, y));
        }
    }

    #[test]
    fn dropped_peer_fails_the_remaining_parties() {
        let field = f23();
        let mut nets = LocalNetwork::new_with_timeout(3, Duration::from_millis(200));
        // party 2 never joins the session
        drop(nets.pop());
        let (tx1, rx1) = mpsc::channel();
        let (tx2, rx2) = mpsc::channel();
        for (tx, net, secret) in izip!([tx1, tx2], nets, [5u64, 7]) {
            thread::spawn(move || {
                let mut state = Rep3State::new(&net, field).unwrap();
                tx.send(arithmetic::sum(secret, &net, &mut state)).unwrap();
            });
        }
        assert!(rx1.recv().unwrap().is_err());
        assert!(rx2.recv().unwrap().is_err());
    }

    #[test]
    fn peer_lost_mid_protocol_is_an_error_not_a_wrong_result() {
        let field = f23();
        let mut nets = LocalNetwork::new_with_timeout(3, Duration::from_millis(200));
        let net2 = nets.pop().unwrap();
        let (tx1, rx1) = mpsc::channel();
        let (tx2, rx2) = mpsc::channel();
        for (tx, net, secret) in izip!([tx1, tx2], nets, [5u64, 7]) {
            thread::spawn(move || {
                let mut state = Rep3State::new(&net, field).unwrap();
                tx.send(arithmetic::sum(secret, &net, &mut state)).unwrap();
            });
        }
        // party 2 completes the share round, then disappears before the
        // partial-sum exchange
        thread::spawn(move || {
            let mut state = Rep3State::new(&net2, field).unwrap();
            arithmetic::share_secret(11, &net2, &mut state).unwrap();
        })
        .join()
        .unwrap();
        assert!(rx1.recv().unwrap().is_err());
        assert!(rx2.recv().unwrap().is_err());
    }

    #[test]
    fn larger_field_sum_and_product_agree_with_plain_arithmetic() {
        let field = PrimeField::new(2147483647).unwrap();
        let mut rng = thread_rng();
        let x = rng.gen_range(0..field.modulus());
        let y = rng.gen_range(0..field.modulus());
        let z = rng.gen_range(0..field.modulus());
        assert_eq!(run_sum(field, [x, y, z]), [field.add(x, field.add(y, z)); 3]);
        assert_eq!(run_product(field, [x, y, 0]), [field.mul(x, y); 3]);
    }
}
