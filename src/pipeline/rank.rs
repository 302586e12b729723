//! Ranking of merged listings.

use crate::models::{BEST_DEAL_BADGE, Listing};

/// Sort listings by price, flag the cheapest as best deal and keep the first `cap`.
///
/// The sort is stable, so equal prices keep their incoming order. Only the
/// first listing gets `best_deal = true`; it also receives the "Best Deal"
/// badge when it has none. Other badges are left alone.
pub fn rank_listings(mut listings: Vec<Listing>, cap: usize) -> Vec<Listing> {
    listings.sort_by(|a, b| a.price.total_cmp(&b.price));

    for (position, listing) in listings.iter_mut().enumerate() {
        listing.best_deal = position == 0;
    }
    if let Some(best) = listings.first_mut() {
        best.badge.get_or_insert_with(|| BEST_DEAL_BADGE.to_string());
    }

    listings.truncate(cap);
    listings
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn listing(id: &str, price: f64) -> Listing {
        Listing {
            id: id.to_string(),
            title: format!("Item {id}"),
            price,
            currency: "USD".to_string(),
            seller: "Test".to_string(),
            rating: 4.0,
            url: format!("https://example.com/{id}"),
            best_deal: false,
            badge: None,
        }
    }

    fn random_listings(rng: &mut StdRng) -> Vec<Listing> {
        let count = rng.gen_range(0..40);
        (0..count)
            .map(|i| {
                // Coarse prices so ties are common
                let price = rng.gen_range(0..50) as f64 * 2.5;
                let mut item = listing(&format!("r{i}"), price);
                item.best_deal = rng.gen_bool(0.3);
                if rng.gen_bool(0.5) {
                    item.badge = Some("Sale".to_string());
                }
                item
            })
            .collect()
    }

    #[test]
    fn test_sorts_and_marks_cheapest() {
        let ranked = rank_listings(
            vec![listing("a", 300.0), listing("b", 150.0), listing("c", 200.0)],
            12,
        );

        let ids: Vec<_> = ranked.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a"]);
        assert!(ranked[0].best_deal);
        assert_eq!(ranked[0].badge.as_deref(), Some(BEST_DEAL_BADGE));
        assert!(!ranked[1].best_deal && !ranked[2].best_deal);
        assert_eq!(ranked[1].badge, None);
    }

    #[test]
    fn test_existing_badge_is_kept() {
        let mut cheap = listing("a", 1.0);
        cheap.badge = Some("Rollback".to_string());
        let ranked = rank_listings(vec![listing("b", 2.0), cheap], 12);
        assert_eq!(ranked[0].badge.as_deref(), Some("Rollback"));
    }

    #[test]
    fn test_ties_keep_incoming_order() {
        let ranked = rank_listings(
            vec![listing("first", 10.0), listing("second", 10.0), listing("x", 5.0)],
            12,
        );
        let ids: Vec<_> = ranked.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["x", "first", "second"]);
    }

    #[test]
    fn test_truncates_to_cap() {
        let listings: Vec<_> = (0..15)
            .rev()
            .map(|i| listing(&i.to_string(), i as f64 * 10.0))
            .collect();
        let ranked = rank_listings(listings, 12);

        assert_eq!(ranked.len(), 12);
        let prices: Vec<_> = ranked.iter().map(|l| l.price).collect();
        let expected: Vec<_> = (0..12).map(|i| i as f64 * 10.0).collect();
        assert_eq!(prices, expected);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank_listings(Vec::new(), 12).is_empty());
    }

    #[test]
    fn test_ranking_invariants_hold_for_random_sets() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let input = random_listings(&mut rng);
            let min_price = input.iter().map(|l| l.price).fold(f64::INFINITY, f64::min);
            let ranked = rank_listings(input.clone(), 12);

            assert!(ranked.len() <= 12);
            assert_eq!(ranked.len(), input.len().min(12));
            assert!(ranked.windows(2).all(|w| w[0].price <= w[1].price));

            if !ranked.is_empty() {
                assert_eq!(ranked.iter().filter(|l| l.best_deal).count(), 1);
                assert!(ranked[0].best_deal);
                assert_eq!(ranked[0].price, min_price);
            }
        }
    }

    #[test]
    fn test_reranking_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let ranked = rank_listings(random_listings(&mut rng), 12);
            assert_eq!(rank_listings(ranked.clone(), 12), ranked);
        }
    }
}
