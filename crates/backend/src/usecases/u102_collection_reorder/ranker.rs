//! Ранжировщик товаров коллекции.
//!
//! Целевой порядок строится в три шага:
//! 1. товары в наличии поднимаются наверх (относительный порядок
//!    сохраняется);
//! 2. недавние новинки без остатка вбрасываются по одной со случайным
//!    шагом 1..3, чтобы не скапливаться в начале;
//! 3. серии одного бренда разбиваются round-robin-ом по брендам.
//!
//! Шаг 2 — единственный источник случайности; генератор передаётся
//! снаружи, чтобы тесты могли подставить сидированный.

use chrono::{DateTime, Months, Utc};
use rand::Rng;

/// Окно "новинки": товары моложе двух календарных месяцев
const RECENT_MONTHS: u32 = 2;

/// Снимок товара коллекции на момент ранжирования
#[derive(Debug, Clone, PartialEq)]
pub struct RankProduct {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub brand: String,
    /// Последний известный остаток (0, если товара нет в учёте)
    pub quantity: i64,
}

/// Результат разбиения на корзины. Относительный порядок внутри каждой
/// корзины совпадает с порядком во входном списке.
#[derive(Debug, Clone)]
pub struct Buckets<'a> {
    pub in_stock: Vec<&'a RankProduct>,
    pub recent: Vec<&'a RankProduct>,
    pub rest: Vec<&'a RankProduct>,
}

/// Разбить товары на корзины одним проходом слева направо
pub fn partition(products: &[RankProduct], now: DateTime<Utc>) -> Buckets<'_> {
    let recent_cutoff = now
        .checked_sub_months(Months::new(RECENT_MONTHS))
        .unwrap_or(now);

    let mut buckets = Buckets {
        in_stock: Vec::new(),
        recent: Vec::new(),
        rest: Vec::new(),
    };

    for product in products {
        if product.quantity > 0 {
            buckets.in_stock.push(product);
        } else if product.created_at >= recent_cutoff {
            buckets.recent.push(product);
        } else {
            buckets.rest.push(product);
        }
    }

    buckets
}

/// Вбросить новинки в базовый порядок со случайным шагом.
///
/// Для каждой новинки позиция вставки = курсор + случайное из [1..3];
/// после вставки курсор встаёт сразу за вставленным элементом. Порядок
/// новинок между собой сохраняется.
pub fn interleave_recent<'a, R: Rng>(
    base: Vec<&'a RankProduct>,
    recent: &[&'a RankProduct],
    rng: &mut R,
) -> Vec<&'a RankProduct> {
    let mut merged = base;
    let mut cursor = 0usize;

    for product in recent {
        let idx = (cursor + rng.gen_range(1..=3)).min(merged.len());
        merged.insert(idx, *product);
        cursor = idx + 1;
    }

    merged
}

/// Разбить серии одного бренда round-robin-ом.
///
/// Бренды обходятся в порядке первого появления во входном списке
/// коллекции, внутри бренда порядок берётся из объединённого списка.
/// При строгом большинстве одного бренда соседство его товаров
/// неизбежно — гарантия здесь только best-effort.
pub fn decluster_brands<'a>(
    merged: &[&'a RankProduct],
    input_order: &[RankProduct],
) -> Vec<&'a RankProduct> {
    let mut brand_order: Vec<&str> = Vec::new();
    for product in input_order {
        if !brand_order.contains(&product.brand.as_str()) {
            brand_order.push(product.brand.as_str());
        }
    }

    let mut groups: Vec<Vec<&RankProduct>> = vec![Vec::new(); brand_order.len()];
    for product in merged {
        if let Some(pos) = brand_order.iter().position(|b| *b == product.brand) {
            groups[pos].push(*product);
        }
    }

    let max_len = groups.iter().map(|g| g.len()).max().unwrap_or(0);
    let mut result = Vec::with_capacity(merged.len());
    for round in 0..max_len {
        for group in &groups {
            if let Some(product) = group.get(round) {
                result.push(*product);
            }
        }
    }

    result
}

/// Построить целевой порядок коллекции
pub fn rank<R: Rng>(products: &[RankProduct], now: DateTime<Utc>, rng: &mut R) -> Vec<i64> {
    let buckets = partition(products, now);

    let mut base = buckets.in_stock;
    base.extend(buckets.rest);

    let merged = interleave_recent(base, &buckets.recent, rng);
    let final_order = decluster_brands(&merged, products);

    debug_assert_eq!(final_order.len(), products.len());
    final_order.iter().map(|p| p.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn now() -> DateTime<Utc> {
        "2024-06-01T12:00:00Z".parse().unwrap()
    }

    fn product(id: i64, brand: &str, quantity: i64, age_days: i64) -> RankProduct {
        RankProduct {
            id,
            created_at: now() - Duration::days(age_days),
            brand: brand.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_partition_buckets() {
        let products = vec![
            product(1, "X", 3, 400),  // в наличии
            product(2, "X", 0, 10),   // новинка
            product(3, "Y", 0, 400),  // остальное
            product(4, "Y", 1, 5),    // в наличии (остаток важнее новизны)
        ];
        let buckets = partition(&products, now());
        assert_eq!(
            buckets.in_stock.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![1, 4]
        );
        assert_eq!(
            buckets.recent.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![2]
        );
        assert_eq!(
            buckets.rest.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![3]
        );
    }

    #[test]
    fn test_rank_is_permutation_across_seeds() {
        for seed in 0..60u64 {
            let mut rng = StdRng::seed_from_u64(seed);

            // Набор меняется от сида: количество, остатки и возраст товаров
            let count = 3 + (seed as usize % 17);
            let brands = ["X", "Y", "Z", "W"];
            let products: Vec<RankProduct> = (0..count)
                .map(|i| {
                    product(
                        i as i64,
                        brands[rng.gen_range(0..brands.len())],
                        rng.gen_range(0..3),
                        rng.gen_range(0..200),
                    )
                })
                .collect();

            let order = rank(&products, now(), &mut rng);
            assert_eq!(order.len(), products.len(), "seed {}", seed);
            let unique: HashSet<i64> = order.iter().copied().collect();
            assert_eq!(unique.len(), products.len(), "seed {}", seed);
            for p in &products {
                assert!(unique.contains(&p.id), "seed {} lost id {}", seed, p.id);
            }
        }
    }

    #[test]
    fn test_in_stock_precedes_rest_in_base_order() {
        // До разбиения брендов все товары в наличии стоят раньше остальных
        let products = vec![
            product(1, "X", 0, 400),
            product(2, "Y", 2, 400),
            product(3, "Z", 0, 400),
            product(4, "W", 1, 400),
        ];
        let buckets = partition(&products, now());
        let mut base = buckets.in_stock.clone();
        base.extend(buckets.rest.clone());

        let ids: Vec<i64> = base.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_rank_deterministic_without_recent_bucket() {
        let products = vec![
            product(1, "X", 0, 400),
            product(2, "Y", 2, 400),
            product(3, "X", 0, 400),
            product(4, "Z", 1, 400),
        ];
        let first = rank(&products, now(), &mut StdRng::seed_from_u64(1));
        let second = rank(&products, now(), &mut StdRng::seed_from_u64(999));
        // Без новинок случайность не используется вовсе
        assert_eq!(first, second);
    }

    #[test]
    fn test_rank_worked_example() {
        // [A(X,0,old), B(X,0,old), C(Y,5), D(Z,0,old)]:
        // base = [C,A,B,D], бренды в порядке входа (X,Y,Z),
        // round-robin: A,C,D затем B
        let products = vec![
            product(1, "X", 0, 400), // A
            product(2, "X", 0, 400), // B
            product(3, "Y", 5, 400), // C
            product(4, "Z", 0, 400), // D
        ];
        let order = rank(&products, now(), &mut StdRng::seed_from_u64(7));
        assert_eq!(order, vec![1, 3, 4, 2]);
    }

    #[test]
    fn test_interleave_recent_spacing() {
        let base_products: Vec<RankProduct> =
            (0..20).map(|i| product(i, "X", 1, 400)).collect();
        let recent_products: Vec<RankProduct> =
            (100..104).map(|i| product(i, "Y", 0, 5)).collect();

        let mut rng = StdRng::seed_from_u64(42);
        let base: Vec<&RankProduct> = base_products.iter().collect();
        let recent: Vec<&RankProduct> = recent_products.iter().collect();
        let merged = interleave_recent(base, &recent, &mut rng);

        assert_eq!(merged.len(), 24);

        let positions: Vec<usize> = merged
            .iter()
            .enumerate()
            .filter(|(_, p)| p.quantity == 0)
            .map(|(i, _)| i)
            .collect();
        let ids_in_order: Vec<i64> = positions.iter().map(|&i| merged[i].id).collect();
        // Порядок новинок между собой сохранён
        assert_eq!(ids_in_order, vec![100, 101, 102, 103]);

        // Первая вставка на позицию 1..3, каждая следующая с шагом 2..4
        assert!((1..=3).contains(&positions[0]));
        for pair in positions.windows(2) {
            let gap = pair[1] - pair[0];
            assert!((2..=4).contains(&gap), "gap {} out of range", gap);
        }
    }

    #[test]
    fn test_decluster_majority_brand_is_best_effort() {
        // Бренд X держит большинство: соседство его товаров неизбежно,
        // но результат остаётся перестановкой
        let products = vec![
            product(1, "X", 1, 400),
            product(2, "X", 1, 400),
            product(3, "X", 1, 400),
            product(4, "Y", 1, 400),
        ];
        let order = rank(&products, now(), &mut StdRng::seed_from_u64(1));
        assert_eq!(order.len(), 4);
        assert_eq!(order, vec![1, 4, 2, 3]);
    }
}
