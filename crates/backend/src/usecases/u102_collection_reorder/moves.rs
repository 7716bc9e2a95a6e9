/// План перемещений для приведения коллекции к целевому порядку.
///
/// Move-мутация витрины задаёт позицию относительно ТЕКУЩЕГО состояния
/// коллекции, поэтому план обязан применяться строго по возрастанию
/// целевой позиции, по одному перемещению за раз. Нарушение порядка или
/// параллельная отправка ломают итоговый порядок.

/// Одно перемещение: товар на абсолютную позицию (нумерация с нуля)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOperation {
    pub product_id: i64,
    pub target_position: i32,
}

/// Построить план перемещений из целевого порядка
pub fn plan_moves(target_order: &[i64]) -> Vec<MoveOperation> {
    target_order
        .iter()
        .enumerate()
        .map(|(idx, &product_id)| MoveOperation {
            product_id,
            target_position: idx as i32,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_covers_every_position_ascending() {
        let target = vec![50, 10, 40, 20, 30];
        let plan = plan_moves(&target);

        assert_eq!(plan.len(), 5);
        for (idx, op) in plan.iter().enumerate() {
            assert_eq!(op.target_position, idx as i32);
            assert_eq!(op.product_id, target[idx]);
        }
        // Строго по возрастанию целевой позиции
        for pair in plan.windows(2) {
            assert!(pair[0].target_position < pair[1].target_position);
        }
    }

    #[test]
    fn test_empty_order_yields_empty_plan() {
        assert!(plan_moves(&[]).is_empty());
    }
}
