use crate::model::{Ingredient, ItemCategory, MenuItem};
use crate::store::{Cart, CartLine};

/// Everything a view needs to render, read at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftSnapshot {
    pub cart: Cart,
    pub menu_items: Vec<MenuItem>,
    pub item_categories: Vec<ItemCategory>,
    pub ingredients: Vec<Ingredient>,
}

impl DraftSnapshot {
    pub fn cart_total(&self) -> f64 {
        self.cart.total_price(&self.menu_items)
    }

    pub fn cart_lines(&self) -> Vec<CartLine> {
        self.cart.lines(&self.menu_items)
    }

    pub fn menu_by_category(&self) -> Vec<CategoryTab> {
        menu_by_category(&self.item_categories, &self.menu_items)
    }
}

/// One tab of the ordering screen.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTab {
    pub category: ItemCategory,
    pub items: Vec<MenuItem>,
}

/// Groups the menu under its categories, keeping both orders.
///
/// Items pointing at a category that is not in `categories` are left out, as are
/// categories without an id.
pub fn menu_by_category(categories: &[ItemCategory], menu: &[MenuItem]) -> Vec<CategoryTab> {
    categories
        .iter()
        .filter_map(|category| {
            let id = category.id?;
            let items = menu
                .iter()
                .filter(|item| item.category_id == id)
                .cloned()
                .collect();
            Some(CategoryTab {
                category: category.clone(),
                items,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CategoryId, MenuItemId};

    #[test]
    fn test_menu_by_category() {
        let categories = vec![
            ItemCategory::new(CategoryId(2), "Sides"),
            ItemCategory::new(CategoryId(1), "Entrees"),
        ];
        let menu = vec![
            MenuItem::new("Orange Chicken", 3.5, CategoryId(1)).with_id(MenuItemId(1)),
            MenuItem::new("Chow Mein", 3.0, CategoryId(2)).with_id(MenuItemId(2)),
            MenuItem::new("Fried Rice", 3.0, CategoryId(2)).with_id(MenuItemId(3)),
            MenuItem::new("Mystery", 1.0, CategoryId(9)).with_id(MenuItemId(4)),
        ];

        let tabs = menu_by_category(&categories, &menu);
        assert_eq!(tabs.len(), 2);
        assert_eq!(tabs[0].category.name, "Sides");
        let sides: Vec<&str> = tabs[0].items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(sides, ["Chow Mein", "Fried Rice"]);
        assert_eq!(tabs[1].items.len(), 1);
    }
}
